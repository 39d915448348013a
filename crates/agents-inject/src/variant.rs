//! Agent variant descriptors
//!
//! A variant is one (runtime, host platform) recipe. All variants share the
//! injection algorithm in [`crate::injector`]; they differ only in the
//! constants below. The environment names and profiler GUIDs are read by the
//! agents themselves and must stay bit-exact.

use crate::base::INIT_CONTAINER_PREFIX;

/// Value of the profiling-enabled variable
pub const PROFILING_ENABLED: &str = "1";

/// Host operating system family of the workload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPlatform {
    /// Windows containers
    Windows,
    /// Linux containers
    Linux,
}

impl HostPlatform {
    /// Where the payload volume is mounted, in both the init and target containers
    pub fn mount_path(self) -> &'static str {
        match self {
            Self::Windows => "\\newrelic-instrumentation",
            Self::Linux => "/newrelic-instrumentation",
        }
    }

    /// Where the agent image keeps its files
    pub fn staging_path(self) -> &'static str {
        match self {
            Self::Windows => "\\instrumentation",
            Self::Linux => "/instrumentation",
        }
    }

    /// Init container command copying the staged agent into the payload volume
    pub fn copy_command(self) -> Vec<String> {
        match self {
            Self::Windows => vec![
                "powershell".to_string(),
                "-Command".to_string(),
                format!(
                    "Copy-Item -Path {}\\* -Destination {} -Recurse -Force",
                    self.staging_path(),
                    self.mount_path()
                ),
            ],
            Self::Linux => vec![
                "cp".to_string(),
                "-a".to_string(),
                format!("{}/.", self.staging_path()),
                format!("{}/", self.mount_path()),
            ],
        }
    }
}

/// Names of the four profiler variables a variant sets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfilerEnv {
    /// Turns the CLR profiler on
    pub enable_profiling: &'static str,
    /// Profiler GUID
    pub profiler: &'static str,
    /// Path to the profiler binary
    pub profiler_path: &'static str,
    /// Agent home directory; also the sentinel for "already injected"
    pub home: &'static str,
}

/// One (runtime, host platform) injection recipe
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentVariant {
    /// Identity matched against `Instrumentation.spec.agent.language`
    pub language: &'static str,
    /// Host family; selects mount path and copy command
    pub platform: HostPlatform,
    /// Variable names
    pub env: ProfilerEnv,
    /// Profiler GUID token
    pub profiler_id: &'static str,
    /// Profiler binary inside the payload volume
    pub profiler_path: &'static str,
    /// Agent home inside the payload volume
    pub home_path: &'static str,
}

impl AgentVariant {
    /// Name of this variant's init container: `newrelic-instrumentation-<language>`
    pub fn init_container_name(&self) -> String {
        format!("{}-{}", INIT_CONTAINER_PREFIX, self.language)
    }

    /// Variable whose presence means this variant was already applied
    pub fn sentinel(&self) -> &'static str {
        self.env.home
    }

    /// Default profiler variables, in injection order
    pub fn env_defaults(&self) -> [(&'static str, &'static str); 4] {
        [
            (self.env.enable_profiling, PROFILING_ENABLED),
            (self.env.profiler, self.profiler_id),
            (self.env.profiler_path, self.profiler_path),
            (self.env.home, self.home_path),
        ]
    }
}

const CORECLR_ENV: ProfilerEnv = ProfilerEnv {
    enable_profiling: "CORECLR_ENABLE_PROFILING",
    profiler: "CORECLR_PROFILER",
    profiler_path: "CORECLR_PROFILER_PATH",
    home: "CORECLR_NEWRELIC_HOME",
};

const CORECLR_PROFILER_ID: &str = "{36032161-FFC0-4B61-B559-F6C5D41BAE5A}";

/// .NET (Core) agent on Windows containers
pub const DOTNET_CORE_WINDOWS: AgentVariant = AgentVariant {
    language: "dotnet-core-windows",
    platform: HostPlatform::Windows,
    env: CORECLR_ENV,
    profiler_id: CORECLR_PROFILER_ID,
    profiler_path: "\\newrelic-instrumentation\\netcore\\NewRelic.Profiler.dll",
    home_path: "\\newrelic-instrumentation\\netcore",
};

/// .NET Framework agent on Windows containers
pub const DOTNET_FRAMEWORK_WINDOWS: AgentVariant = AgentVariant {
    language: "dotnet-framework-windows",
    platform: HostPlatform::Windows,
    env: ProfilerEnv {
        enable_profiling: "COR_ENABLE_PROFILING",
        profiler: "COR_PROFILER",
        profiler_path: "COR_PROFILER_PATH",
        home: "NEWRELIC_HOME",
    },
    profiler_id: "{71DA0A04-7777-4EC6-9643-7D28B46A8A41}",
    profiler_path: "\\newrelic-instrumentation\\netframework\\NewRelic.Profiler.dll",
    home_path: "\\newrelic-instrumentation\\netframework",
};

/// .NET (Core) agent on Linux containers
pub const DOTNET_LINUX: AgentVariant = AgentVariant {
    language: "dotnet",
    platform: HostPlatform::Linux,
    env: CORECLR_ENV,
    profiler_id: CORECLR_PROFILER_ID,
    profiler_path: "/newrelic-instrumentation/libNewRelicProfiler.so",
    home_path: "/newrelic-instrumentation",
};

/// Variants compiled into the operator
pub const BUILTIN_VARIANTS: &[AgentVariant] =
    &[DOTNET_CORE_WINDOWS, DOTNET_FRAMEWORK_WINDOWS, DOTNET_LINUX];

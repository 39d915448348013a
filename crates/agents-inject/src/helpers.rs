//! Presence checks and insert-if-absent setters over Pod specs
//!
//! Kubernetes models most lists as `Option<Vec<_>>`. The predicates here treat
//! `None` as empty and never materialize a list, so a Pod that is only
//! inspected stays byte-identical.

use k8s_openapi::api::core::v1::{Container, EnvVar, PodSpec};

/// Position of the first variable called `name`, if any
pub fn index_of_env(envs: &[EnvVar], name: &str) -> Option<usize> {
    envs.iter().position(|e| e.name == name)
}

/// Whether the container already declares a variable called `name`
pub fn has_env(container: &Container, name: &str) -> bool {
    container
        .env
        .as_deref()
        .is_some_and(|envs| index_of_env(envs, name).is_some())
}

/// Set a literal variable on the container.
///
/// Appends when absent. When present, the existing entry is replaced only if
/// `overwrite` is set; otherwise the declared value (literal or reference)
/// survives untouched.
pub fn set_env_var(container: &mut Container, name: &str, value: &str, overwrite: bool) {
    let envs = container.env.get_or_insert_with(Vec::new);
    match index_of_env(envs, name) {
        None => envs.push(EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }),
        Some(idx) if overwrite => {
            envs[idx].value = Some(value.to_string());
            envs[idx].value_from = None;
        }
        Some(_) => {}
    }
}

/// Append `var` unless a variable of the same name is already declared
pub fn append_env_if_absent(container: &mut Container, var: &EnvVar) {
    let envs = container.env.get_or_insert_with(Vec::new);
    if index_of_env(envs, &var.name).is_none() {
        envs.push(var.clone());
    }
}

/// Whether the container lacks a mount of the named volume
pub fn container_volume_missing(container: &Container, volume_name: &str) -> bool {
    !container
        .volume_mounts
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|m| m.name == volume_name)
}

/// Whether the pod lacks a volume with the given name
pub fn pod_volume_missing(spec: &PodSpec, volume_name: &str) -> bool {
    !spec
        .volumes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|v| v.name == volume_name)
}

/// Whether the pod lacks an init container with the given name
pub fn init_container_missing(spec: &PodSpec, name: &str) -> bool {
    !spec
        .init_containers
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{EnvVarSource, SecretKeySelector, Volume, VolumeMount};

    fn literal(name: &str, value: &str) -> EnvVar {
        EnvVar {
            name: name.to_string(),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn container_with_env(envs: Vec<EnvVar>) -> Container {
        Container {
            name: "app".to_string(),
            env: Some(envs),
            ..Default::default()
        }
    }

    #[test]
    fn index_of_env_finds_first_match() {
        let envs = vec![literal("A", "1"), literal("B", "2"), literal("A", "3")];
        assert_eq!(index_of_env(&envs, "A"), Some(0));
        assert_eq!(index_of_env(&envs, "B"), Some(1));
        assert_eq!(index_of_env(&envs, "C"), None);
        assert_eq!(index_of_env(&[], "A"), None);
    }

    #[test]
    fn set_env_var_appends_when_absent() {
        let mut container = Container::default();
        set_env_var(&mut container, "CORECLR_ENABLE_PROFILING", "1", false);

        let envs = container.env.expect("env should be created");
        assert_eq!(envs, vec![literal("CORECLR_ENABLE_PROFILING", "1")]);
    }

    #[test]
    fn set_env_var_keeps_existing_value_without_overwrite() {
        let mut container =
            container_with_env(vec![literal("COR_PROFILER_PATH", "D:\\custom.dll")]);
        set_env_var(&mut container, "COR_PROFILER_PATH", "\\default.dll", false);

        let envs = container.env.expect("env");
        assert_eq!(envs.len(), 1);
        assert_eq!(envs[0].value.as_deref(), Some("D:\\custom.dll"));
    }

    #[test]
    fn set_env_var_keeps_secret_reference_without_overwrite() {
        let from_secret = EnvVar {
            name: "NEW_RELIC_APP_NAME".to_string(),
            value_from: Some(EnvVarSource {
                secret_key_ref: Some(SecretKeySelector {
                    name: "app-names".to_string(),
                    key: "checkout".to_string(),
                    optional: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut container = container_with_env(vec![from_secret.clone()]);
        set_env_var(&mut container, "NEW_RELIC_APP_NAME", "checkout", false);

        assert_eq!(container.env, Some(vec![from_secret]));
    }

    #[test]
    fn set_env_var_overwrite_replaces_value_and_reference() {
        let mut container = container_with_env(vec![EnvVar {
            name: "X".to_string(),
            value_from: Some(EnvVarSource::default()),
            ..Default::default()
        }]);
        set_env_var(&mut container, "X", "literal", true);

        assert_eq!(container.env, Some(vec![literal("X", "literal")]));
    }

    #[test]
    fn append_env_if_absent_is_first_write_wins() {
        let mut container = container_with_env(vec![literal("LOG_LEVEL", "info")]);
        append_env_if_absent(&mut container, &literal("LOG_LEVEL", "debug"));
        append_env_if_absent(&mut container, &literal("TRACE", "on"));

        assert_eq!(
            container.env,
            Some(vec![literal("LOG_LEVEL", "info"), literal("TRACE", "on")])
        );
    }

    #[test]
    fn has_env_treats_missing_list_as_empty() {
        let container = Container::default();
        assert!(!has_env(&container, "NEWRELIC_HOME"));
        assert!(container.env.is_none(), "predicate must not create the list");

        let container = container_with_env(vec![literal("NEWRELIC_HOME", "\\x")]);
        assert!(has_env(&container, "NEWRELIC_HOME"));
    }

    #[test]
    fn volume_and_init_container_predicates() {
        let mut spec = PodSpec::default();
        let mut container = Container::default();

        assert!(container_volume_missing(&container, "payload"));
        assert!(pod_volume_missing(&spec, "payload"));
        assert!(init_container_missing(&spec, "copy"));
        assert!(spec.volumes.is_none() && spec.init_containers.is_none());

        container.volume_mounts = Some(vec![VolumeMount {
            name: "payload".to_string(),
            mount_path: "/payload".to_string(),
            ..Default::default()
        }]);
        spec.volumes = Some(vec![Volume {
            name: "payload".to_string(),
            ..Default::default()
        }]);
        spec.init_containers = Some(vec![Container {
            name: "copy".to_string(),
            ..Default::default()
        }]);

        assert!(!container_volume_missing(&container, "payload"));
        assert!(!pod_volume_missing(&spec, "payload"));
        assert!(!init_container_missing(&spec, "copy"));
        assert!(init_container_missing(&spec, "other"));
    }
}

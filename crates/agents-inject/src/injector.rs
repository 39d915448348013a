//! The injector contract and its table-driven implementation
//!
//! Injection runs in three phases:
//! 1. Acceptability: a mismatched language or a Pod without containers is a
//!    silent pass-through.
//! 2. Checks: license secret validation and the sentinel guard. Both run
//!    before anything is copied or mutated.
//! 3. Mutation: merge spec env, profiler defaults, payload mount, payload
//!    volume + init container, shared APM config. Every step is
//!    insert-if-absent.

use agents_common::crd::Instrumentation;
use k8s_openapi::api::core::v1::{
    Container, EmptyDirVolumeSource, Namespace, Pod, PodSpec, Volume, VolumeMount,
};
use tracing::{debug, info};

use crate::base::{
    inject_common_config, pod_display_name, validate, TARGET_CONTAINER, VOLUME_NAME,
};
use crate::error::{ConfigSource, InjectError};
use crate::helpers::{
    append_env_if_absent, container_volume_missing, has_env, index_of_env,
    init_container_missing, pod_volume_missing, set_env_var,
};
use crate::variant::AgentVariant;

/// Attaches one agent flavor to a Pod
pub trait Injector: Send + Sync {
    /// Identity matched against `Instrumentation.spec.agent.language`
    fn language(&self) -> &str;

    /// Return the instrumented Pod, or an unchanged copy when the
    /// Instrumentation is not for this injector. On error the caller's Pod is
    /// untouched.
    fn inject(
        &self,
        inst: &Instrumentation,
        namespace: &Namespace,
        pod: &Pod,
    ) -> Result<Pod, InjectError>;
}

/// Injector driven by an [`AgentVariant`] descriptor
#[derive(Clone, Debug)]
pub struct VariantInjector {
    variant: AgentVariant,
}

impl VariantInjector {
    /// Create an injector for the given variant
    pub fn new(variant: AgentVariant) -> Self {
        Self { variant }
    }

    /// The descriptor this injector applies
    pub fn variant(&self) -> &AgentVariant {
        &self.variant
    }

    fn acceptable(&self, inst: &Instrumentation, pod: &Pod) -> bool {
        inst.language() == self.variant.language && target_container(pod).is_some()
    }

    /// Refuse to layer a second copy when the sentinel is already declared
    fn check_sentinel(
        &self,
        inst: &Instrumentation,
        container: &Container,
    ) -> Result<(), InjectError> {
        let sentinel = self.variant.sentinel();
        if has_env(container, sentinel) {
            return Err(InjectError::duplicate(sentinel, ConfigSource::Container));
        }
        if index_of_env(&inst.spec.agent.env, sentinel).is_some() {
            return Err(InjectError::duplicate(
                sentinel,
                ConfigSource::InstrumentationSpec,
            ));
        }
        Ok(())
    }

    fn apply(&self, inst: &Instrumentation, spec: &mut PodSpec) {
        let mount_path = self.variant.platform.mount_path();

        if let Some(container) = spec.containers.get_mut(TARGET_CONTAINER) {
            for var in &inst.spec.agent.env {
                append_env_if_absent(container, var);
            }
            for (name, value) in self.variant.env_defaults() {
                set_env_var(container, name, value, false);
            }
            if container_volume_missing(container, VOLUME_NAME) {
                container
                    .volume_mounts
                    .get_or_insert_with(Vec::new)
                    .push(payload_mount(mount_path));
            }
        }

        let init_name = self.variant.init_container_name();
        if init_container_missing(spec, &init_name) {
            if pod_volume_missing(spec, VOLUME_NAME) {
                spec.volumes.get_or_insert_with(Vec::new).push(Volume {
                    name: VOLUME_NAME.to_string(),
                    empty_dir: Some(EmptyDirVolumeSource::default()),
                    ..Default::default()
                });
            }
            spec.init_containers
                .get_or_insert_with(Vec::new)
                .push(Container {
                    name: init_name,
                    image: Some(inst.spec.agent.image.clone()),
                    command: Some(self.variant.platform.copy_command()),
                    volume_mounts: Some(vec![payload_mount(mount_path)]),
                    ..Default::default()
                });
        }
    }
}

impl Injector for VariantInjector {
    fn language(&self) -> &str {
        self.variant.language
    }

    fn inject(
        &self,
        inst: &Instrumentation,
        namespace: &Namespace,
        pod: &Pod,
    ) -> Result<Pod, InjectError> {
        if !self.acceptable(inst, pod) {
            return Ok(pod.clone());
        }
        validate(inst)?;

        // acceptable() guarantees a target container
        if let Some(container) = target_container(pod) {
            self.check_sentinel(inst, container)?;
        }

        let mut mutated = pod.clone();
        if let Some(spec) = mutated.spec.as_mut() {
            self.apply(inst, spec);
        }
        inject_common_config(
            &inst.spec.resource,
            namespace,
            &mut mutated,
            TARGET_CONTAINER,
            &inst.spec.license_key_secret,
        );

        info!(
            language = self.variant.language,
            namespace = namespace.metadata.name.as_deref().unwrap_or_default(),
            pod = pod_display_name(&mutated),
            "injected APM agent"
        );
        debug!(
            init_container = %self.variant.init_container_name(),
            image = %inst.spec.agent.image,
            "payload copy scheduled"
        );
        Ok(mutated)
    }
}

fn target_container(pod: &Pod) -> Option<&Container> {
    pod.spec
        .as_ref()
        .and_then(|s| s.containers.get(TARGET_CONTAINER))
}

fn payload_mount(mount_path: &str) -> VolumeMount {
    VolumeMount {
        name: VOLUME_NAME.to_string(),
        mount_path: mount_path.to_string(),
        ..Default::default()
    }
}

//! Dispatch from an Instrumentation to the injector for its language

use std::collections::BTreeSet;
use std::sync::Arc;

use agents_common::crd::Instrumentation;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use tracing::{debug, warn};

use crate::base::pod_display_name;
use crate::error::InjectError;
use crate::registry::InjectorRegistry;

/// Entry point used by the admission layer
#[derive(Clone, Debug)]
pub struct PodMutator {
    registry: Arc<InjectorRegistry>,
}

impl PodMutator {
    /// Create a mutator over a shared registry
    pub fn new(registry: Arc<InjectorRegistry>) -> Self {
        Self { registry }
    }

    /// The registry injectors are looked up in
    pub fn registry(&self) -> &InjectorRegistry {
        &self.registry
    }

    /// Apply one Instrumentation. Unknown languages are not errors.
    pub fn mutate(
        &self,
        inst: &Instrumentation,
        namespace: &Namespace,
        pod: &Pod,
    ) -> Result<Pod, InjectError> {
        match self.registry.lookup(inst.language()) {
            Some(injector) => injector.inject(inst, namespace, pod),
            None => {
                debug!(
                    language = inst.language(),
                    pod = pod_display_name(pod),
                    "no injector registered for language"
                );
                Ok(pod.clone())
            }
        }
    }

    /// Apply every Instrumentation in order.
    ///
    /// Only the first Instrumentation per language is used. The first error
    /// aborts the pass; the caller's Pod is never modified.
    pub fn mutate_all(
        &self,
        instrumentations: &[Instrumentation],
        namespace: &Namespace,
        pod: &Pod,
    ) -> Result<Pod, InjectError> {
        let mut applied = BTreeSet::new();
        let mut current = pod.clone();
        for inst in instrumentations {
            let language = inst.language();
            if self.registry.lookup(language).is_some() && !applied.insert(language) {
                warn!(
                    language,
                    instrumentation = inst.metadata.name.as_deref().unwrap_or_default(),
                    pod = pod_display_name(pod),
                    "skipping instrumentation, language already applied"
                );
                continue;
            }
            current = self.mutate(inst, namespace, &current)?;
        }
        Ok(current)
    }
}

//! Instrumentation CRD
//!
//! An Instrumentation names an APM agent flavor (`agent.language`), the image
//! that carries the agent payload, extra environment for the target container,
//! and the Secret holding the license key. The admission webhook offers every
//! candidate Instrumentation to the injectors; each injector decides on its own
//! whether the spec is within its jurisdiction.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::EnvVar;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Resource attribute that overrides the generated application name
pub const SERVICE_NAME_ATTRIBUTE: &str = "service.name";

/// Instrumentation describes how to attach an APM agent to a workload.
///
/// Example:
/// ```yaml
/// apiVersion: newrelic.com/v1alpha2
/// kind: Instrumentation
/// metadata:
///   name: dotnet-core
///   namespace: newrelic
/// spec:
///   agent:
///     language: dotnet-core-windows
///     image: newrelic/newrelic-dotnet-windows-init:latest
///     env:
///       - name: NEW_RELIC_LOG_LEVEL
///         value: debug
///   licenseKeySecret: newrelic-key-secret
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "newrelic.com",
    version = "v1alpha2",
    kind = "Instrumentation",
    namespaced,
    printcolumn = r#"{"name":"Language","type":"string","jsonPath":".spec.agent.language"}"#,
    printcolumn = r#"{"name":"Image","type":"string","jsonPath":".spec.agent.image"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentationSpec {
    /// Agent flavor, payload image and extra environment
    #[serde(default)]
    pub agent: Agent,

    /// Naming conventions for the generated agent configuration
    #[serde(default)]
    pub resource: Resource,

    /// Name of the Secret holding the license key (must not be blank)
    #[serde(default)]
    pub license_key_secret: String,
}

/// Agent flavor and payload
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Variant identity, e.g. `dotnet-core-windows`
    #[serde(default)]
    pub language: String,

    /// Init container image carrying the agent files under its staging path
    #[serde(default)]
    pub image: String,

    /// Environment merged into the target container (container values win)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

/// Resource naming conventions
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Extra resource attributes; `service.name` overrides the application name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Resource {
    /// Explicit application name, if one is configured and non-blank
    pub fn service_name(&self) -> Option<&str> {
        self.attributes
            .get(SERVICE_NAME_ATTRIBUTE)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

impl Instrumentation {
    /// Variant identity this Instrumentation targets
    pub fn language(&self) -> &str {
        &self.spec.agent.language
    }

    /// Whether a license key Secret has been named
    pub fn has_license_key_secret(&self) -> bool {
        !self.spec.license_key_secret.trim().is_empty()
    }
}

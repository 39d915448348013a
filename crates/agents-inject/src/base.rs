//! Behavior shared by every injector variant
//!
//! - [`validate`]: the one precondition common to all variants
//! - [`inject_common_config`]: the APM configuration block (application name,
//!   license key reference, operator labels) added to the target container

use agents_common::crd::{Instrumentation, Resource};
use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, Namespace, Pod, SecretKeySelector};
use tracing::debug;

use crate::error::InjectError;
use crate::helpers::{has_env, set_env_var};

/// Application name reported by the agent
pub const ENV_APP_NAME: &str = "NEW_RELIC_APP_NAME";
/// License key, resolved from a Secret at container start
pub const ENV_LICENSE_KEY: &str = "NEW_RELIC_LICENSE_KEY";
/// Static labels marking operator-driven injection
pub const ENV_LABELS: &str = "NEW_RELIC_LABELS";
/// Flag marking operator-managed injection
pub const ENV_K8S_OPERATOR_ENABLED: &str = "NEW_RELIC_K8S_OPERATOR_ENABLED";

/// Key inside the license Secret
pub const LICENSE_KEY_SECRET_KEY: &str = "new_relic_license_key";
/// Value of [`ENV_LABELS`]
pub const OPERATOR_LABELS: &str = "operator:auto-injection";

/// Name of the shared payload volume
pub const VOLUME_NAME: &str = "newrelic-instrumentation";
/// Prefix of every generated init container name
pub const INIT_CONTAINER_PREFIX: &str = "newrelic-instrumentation";

/// Only the first container of a Pod is instrumented
pub const TARGET_CONTAINER: usize = 0;

/// Check the preconditions shared by every variant
pub fn validate(inst: &Instrumentation) -> Result<(), InjectError> {
    if !inst.has_license_key_secret() {
        return Err(InjectError::configuration(
            "licenseKeySecret must not be blank",
        ));
    }
    Ok(())
}

/// Add the shared APM configuration block to the container at `container_index`.
///
/// Each variable is only added when the container doesn't declare it yet. The
/// license key is a `secretKeyRef` marked optional: a missing Secret or key
/// leaves the variable unresolved at runtime instead of blocking the Pod.
pub fn inject_common_config(
    resource: &Resource,
    namespace: &Namespace,
    pod: &mut Pod,
    container_index: usize,
    license_key_secret: &str,
) {
    let pod_name = pod_display_name(pod).to_string();
    let Some(container) = pod
        .spec
        .as_mut()
        .and_then(|s| s.containers.get_mut(container_index))
    else {
        return;
    };

    let app_name = resource
        .service_name()
        .map(str::to_string)
        .unwrap_or_else(|| container.name.clone());

    debug!(
        namespace = namespace.metadata.name.as_deref().unwrap_or_default(),
        pod = %pod_name,
        container = %container.name,
        app_name = %app_name,
        "adding APM configuration"
    );

    set_env_var(container, ENV_APP_NAME, &app_name, false);

    if !has_env(container, ENV_LICENSE_KEY) {
        container
            .env
            .get_or_insert_with(Vec::new)
            .push(license_key_env(license_key_secret));
    }

    set_env_var(container, ENV_LABELS, OPERATOR_LABELS, false);
    set_env_var(container, ENV_K8S_OPERATOR_ENABLED, "true", false);
}

/// `NEW_RELIC_LICENSE_KEY` referencing the license Secret
fn license_key_env(secret_name: &str) -> EnvVar {
    EnvVar {
        name: ENV_LICENSE_KEY.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.to_string(),
                key: LICENSE_KEY_SECRET_KEY.to_string(),
                optional: Some(true),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Best-effort Pod name for logs; admission-time Pods often only carry `generateName`
pub(crate) fn pod_display_name(pod: &Pod) -> &str {
    pod.metadata
        .name
        .as_deref()
        .or(pod.metadata.generate_name.as_deref())
        .unwrap_or("<unnamed>")
}

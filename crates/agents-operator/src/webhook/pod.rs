//! Pod Mutation Webhook
//!
//! Handles AdmissionReview requests for Pods, injecting APM agents from the
//! Instrumentations visible to the operator.

use std::sync::Arc;

use agents_inject::InjectError;
use axum::{extract::State, Json};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::api::{DynamicObject, ObjectMeta};
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use tracing::{debug, error, info, warn};

use super::WebhookState;

/// Namespace assumed when neither the request nor the Pod names one
const FALLBACK_NAMESPACE: &str = "default";

/// Error type for webhook operations
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Namespace or Instrumentation lookup failed
    #[error("lookup failed: {0}")]
    Lookup(#[from] agents_common::Error),

    /// An injector refused the Pod
    #[error(transparent)]
    Injection(#[from] InjectError),

    /// The Pod could not be converted to JSON for diffing
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Handle mutating admission review for Pods
pub async fn mutate_handler(
    State(state): State<Arc<WebhookState>>,
    Json(body): Json<AdmissionReview<Pod>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let req: AdmissionRequest<Pod> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    let response = mutate_pod(&state, &req).await;
    Json(response.into_review())
}

/// Process a single Pod admission request
///
/// Never fails: lookup and injection errors become a denial with the error
/// message, and a Pod nothing applies to is allowed unchanged.
pub async fn mutate_pod(
    state: &WebhookState,
    request: &AdmissionRequest<Pod>,
) -> AdmissionResponse {
    let uid = request.uid.as_str();

    let Some(pod) = &request.object else {
        debug!(uid = %uid, "No pod object in request, allowing unchanged");
        return AdmissionResponse::from(request);
    };

    let namespace = request
        .namespace
        .as_deref()
        .or(pod.metadata.namespace.as_deref())
        .unwrap_or(FALLBACK_NAMESPACE);

    match inject(state, namespace, pod).await {
        Ok(None) => {
            debug!(uid = %uid, namespace = %namespace, "No agent injected, allowing unchanged");
            AdmissionResponse::from(request)
        }
        Ok(Some(patch)) => {
            info!(
                uid = %uid,
                namespace = %namespace,
                pod = ?pod.metadata.name.as_ref().or(pod.metadata.generate_name.as_ref()),
                patch_ops = patch.0.len(),
                "Applying agent injection patch"
            );
            match AdmissionResponse::from(request).with_patch(patch) {
                Ok(response) => response,
                Err(e) => {
                    error!(uid = %uid, error = %e, "Failed to serialize patch");
                    AdmissionResponse::from(request)
                        .deny(format!("patch serialization error: {e}"))
                }
            }
        }
        Err(e) => {
            let retryable = matches!(&e, WebhookError::Lookup(err) if err.is_retryable());
            warn!(uid = %uid, namespace = %namespace, retryable, error = %e, "Denying pod");
            AdmissionResponse::from(request).deny(e.to_string())
        }
    }
}

/// Run every candidate Instrumentation against the Pod; `None` when nothing changed
async fn inject(
    state: &WebhookState,
    namespace_name: &str,
    pod: &Pod,
) -> Result<Option<json_patch::Patch>, WebhookError> {
    let namespace = state
        .source
        .namespace(namespace_name)
        .await?
        .unwrap_or_else(|| Namespace {
            metadata: ObjectMeta {
                name: Some(namespace_name.to_string()),
                ..Default::default()
            },
            ..Default::default()
        });

    let mut candidates = state.source.instrumentations(namespace_name).await?;
    // Deterministic order so the first Instrumentation per language is stable
    candidates.sort_by(|a, b| {
        (a.metadata.namespace.as_deref(), a.metadata.name.as_deref())
            .cmp(&(b.metadata.namespace.as_deref(), b.metadata.name.as_deref()))
    });

    let mutated = state.mutator.mutate_all(&candidates, &namespace, pod)?;
    let patch = build_patch(pod, &mutated)?;
    Ok((!patch.0.is_empty()).then_some(patch))
}

/// RFC 6902 patch turning `original` into `mutated`
pub fn build_patch(
    original: &Pod,
    mutated: &Pod,
) -> Result<json_patch::Patch, serde_json::Error> {
    let left = serde_json::to_value(original)?;
    let right = serde_json::to_value(mutated)?;
    Ok(json_patch::diff(&left, &right))
}

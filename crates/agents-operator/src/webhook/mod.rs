//! Mutating admission webhook for Pods
//!
//! The API server sends every Pod CREATE to `/mutate-v1-pod`. The handler
//! offers each candidate Instrumentation to the [`PodMutator`] and answers
//! with a JSON patch, or a denial carrying the injection error.

pub mod pod;

use std::sync::Arc;

use agents_inject::PodMutator;
use axum::routing::{get, post};
use axum::Router;

use crate::source::InstrumentationSource;

/// Path the MutatingWebhookConfiguration points at
pub const MUTATE_POD_PATH: &str = "/mutate-v1-pod";

/// Shared state for webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    /// Lookup of Namespaces and Instrumentations
    pub source: Arc<dyn InstrumentationSource>,
    /// Injection entry point
    pub mutator: PodMutator,
}

impl WebhookState {
    /// Create webhook state from its collaborators
    pub fn new(source: Arc<dyn InstrumentationSource>, mutator: PodMutator) -> Self {
        Self { source, mutator }
    }
}

/// Create the webhook router
///
/// - POST /mutate-v1-pod - inject APM agents into Pods
/// - GET /healthz - liveness probe
pub fn webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(MUTATE_POD_PATH, post(pod::mutate_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

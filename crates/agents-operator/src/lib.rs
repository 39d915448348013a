//! Admission webhook that injects APM agents into Pods
//!
//! Wires the injection core (`agents-inject`) to Kubernetes: Instrumentations
//! are read through an [`source::InstrumentationSource`], and the resulting
//! Pod changes are returned to the API server as a JSON patch.

#![deny(missing_docs)]

pub mod config;
pub mod source;
pub mod webhook;

pub use config::Cli;
pub use source::{InstrumentationSource, KubeInstrumentationSource};
pub use webhook::{webhook_router, WebhookState};

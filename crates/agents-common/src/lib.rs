//! Common types for the agents operator: the Instrumentation CRD, errors, and logging

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod telemetry;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Field manager / component name used in logs and admission responses
pub const OPERATOR_NAME: &str = "agents-operator";

/// Default address for the admission webhook HTTPS server
///
/// Port 9443 is used instead of 443 to avoid requiring root privileges.
pub const DEFAULT_WEBHOOK_ADDR: &str = "0.0.0.0:9443";

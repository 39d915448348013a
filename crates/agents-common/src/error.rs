//! Error types for the agents operator
//!
//! These cover the operator's outer surfaces. Injection errors live next to
//! the injectors in `agents-inject`.

use thiserror::Error;

/// Main error type for operator operations
#[derive(Debug, Error)]
pub enum Error {
    /// Kubernetes API error
    #[error("kubernetes error: {source}")]
    Kube {
        /// The underlying kube-rs error
        #[from]
        source: kube::Error,
    },

    /// Invalid runtime configuration or request input
    #[error("configuration error: {message}")]
    Config {
        /// Description of what's invalid
        message: String,
    },
}

impl Error {
    /// Create a configuration error with the given message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the admission layer should treat this as a transient failure
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Kube { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Story: an admission request without a namespace name is a caller problem
    #[test]
    fn story_blank_namespace_is_config_error() {
        let err = Error::config("namespace name must not be blank");
        assert_eq!(
            err.to_string(),
            "configuration error: namespace name must not be blank"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn kube_errors_are_retryable() {
        let err = Error::from(kube::Error::Service(Box::new(std::io::Error::other(
            "connection reset",
        ))));
        assert!(err.to_string().starts_with("kubernetes error"));
        assert!(err.is_retryable());
    }
}

//! Injection error types
//!
//! Every error is raised before the first mutation, so a caller that receives
//! one still holds the Pod exactly as it was submitted.

use std::fmt;

/// Where a conflicting sentinel variable was found
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// The target container's own environment
    Container,
    /// The Instrumentation's `agent.env` list
    InstrumentationSpec,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => f.write_str("container"),
            Self::InstrumentationSpec => f.write_str("instrumentation spec"),
        }
    }
}

/// Errors returned by injectors and the registry
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InjectError {
    /// A required Instrumentation field is missing or blank
    #[error("{message}")]
    Configuration {
        /// Plain description surfaced to the admission layer
        message: String,
    },

    /// The variant's sentinel variable is already present
    #[error("{variable} environment variable is already set in the {origin}")]
    DuplicateConfiguration {
        /// Sentinel variable name
        variable: String,
        /// Which input carried it
        origin: ConfigSource,
    },

    /// Two injectors claim the same language identity
    #[error("an injector for language '{0}' is already registered")]
    DuplicateInjector(String),
}

impl InjectError {
    /// Create a configuration error with the given message
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create a duplicate-configuration error for a sentinel variable
    pub fn duplicate(variable: impl Into<String>, origin: ConfigSource) -> Self {
        Self::DuplicateConfiguration {
            variable: variable.into(),
            origin,
        }
    }
}

//! APM agent injection for Pod specs
//!
//! Attaches an APM agent to the first container of a Pod at admission time:
//! environment for the profiler, a shared `emptyDir` payload volume, and an
//! init container that copies the agent files into it. Every mutation is an
//! insert-if-absent, and a sentinel environment variable guards against
//! applying the same variant twice.
//!
//! # Usage
//!
//! ```rust,ignore
//! let registry = Arc::new(InjectorRegistry::builtin()?);
//! let mutator = PodMutator::new(registry);
//! let mutated = mutator.mutate(&instrumentation, &namespace, &pod)?;
//! ```
//!
//! The crate performs no I/O. The license key Secret is referenced by name
//! only and resolved by the kubelet when the container starts.

#![deny(missing_docs)]

pub mod base;
pub mod error;
pub mod helpers;
pub mod injector;
pub mod mutator;
pub mod registry;
pub mod variant;

pub use error::{ConfigSource, InjectError};
pub use injector::{Injector, VariantInjector};
pub use mutator::PodMutator;
pub use registry::InjectorRegistry;
pub use variant::{AgentVariant, HostPlatform, ProfilerEnv, BUILTIN_VARIANTS};

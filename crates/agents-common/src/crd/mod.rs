//! Custom Resource Definitions for the agents operator

mod instrumentation;

pub use instrumentation::{
    Agent, Instrumentation, InstrumentationSpec, Resource, SERVICE_NAME_ATTRIBUTE,
};

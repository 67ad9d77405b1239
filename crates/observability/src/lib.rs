//! Tracing and logging (shared setup).

pub mod logging;

pub use logging::{init, LogFormat, ObservabilityConfig, ObservabilityError};

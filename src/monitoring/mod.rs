//! Monitoring Module
//!
//! Log subscriber setup for hosts embedding authgate.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};

#[cfg(test)]
pub(crate) mod capture;

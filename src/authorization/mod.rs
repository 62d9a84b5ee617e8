//! Authorization Module
//!
//! Nodes of an authorization stack, each wrapping one untrusted plugin:
//! - Control flags
//! - Node templates
//! - Fault boundary
//! - Plugin adapter

pub mod adapter;
pub mod flag;
pub mod guard;
pub mod template;

pub use adapter::{AdapterSnapshot, PluginAdapter, PluginStatus};
pub use flag::AuthControlFlag;
pub use guard::{Fault, Outcome};
pub use template::NodeTemplate;

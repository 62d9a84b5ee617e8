//! # authgate - fault-isolating authorization plugins
//!
//! Wraps third-party authorization plugins so a policy evaluator can drive
//! them without their failures leaking out:
//! - **Plugin**: the contract plugins implement, plus a factory registry
//! - **Authorization**: the adapter node with fail-closed checks
//! - **Monitoring**: `tracing` subscriber setup
//!
//! ## Quick Start
//!
//! ```rust
//! use authgate::authorization::{AuthControlFlag, NodeTemplate};
//! use authgate::plugin::{AllowAllPlugin, AuthRequest, PluginConfig, PluginRegistry, Subject};
//!
//! let mut registry = PluginRegistry::new();
//! registry.register_type::<AllowAllPlugin>().unwrap();
//!
//! let node = NodeTemplate::new(
//!     AuthControlFlag::Required,
//!     std::any::type_name::<AllowAllPlugin>(),
//! )
//! .instantiate();
//!
//! registry.rebind_all([&node]);
//! node.load(&PluginConfig::new());
//!
//! assert!(node.is_allowed_for(&AuthRequest::new(), &Subject::project("kernel")));
//! ```

pub mod authorization;
pub mod core;
pub mod monitoring;
pub mod plugin;

pub use authorization::{AuthControlFlag, NodeTemplate, PluginAdapter, PluginStatus};
pub use crate::core::error::{Error, Result};

//! Plugin Module
//!
//! The boundary to third-party authorization code:
//! - Plugin interface
//! - Factory registry

pub mod interface;
pub mod registry;

pub use interface::{
    AllowAllPlugin, AuthRequest, AuthorizationPlugin, DenyAllPlugin, PluginConfig, PluginError,
    PluginResult, Subject,
};
pub use registry::{PluginFactory, PluginRegistry};

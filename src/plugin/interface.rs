//! Plugin interface definition.
//!
//! Defines the contract third-party authorization plugins implement and the
//! values passed across it. Nothing here trusts the implementor: every call
//! into an [`AuthorizationPlugin`] goes through the adapter's fault boundary.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Configuration handed to a plugin's load routine.
pub type PluginConfig = HashMap<String, serde_json::Value>;

/// Result type for plugin operations.
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Plugin-specific error.
#[derive(Clone, Debug)]
pub struct PluginError {
    /// Error message
    pub message: String,
    /// Error code
    pub code: i32,
    /// Is recoverable
    pub recoverable: bool,
}

impl PluginError {
    /// Create a new error.
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            code: -1,
            recoverable: true,
        }
    }

    /// Create a fatal error.
    pub fn fatal(message: &str) -> Self {
        Self {
            message: message.to_string(),
            code: -1,
            recoverable: false,
        }
    }

    /// Set the error code.
    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PluginError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for PluginError {}

/// The request an authorization check is made for.
///
/// Only the correlation id and an optional user label are carried; they
/// exist so log lines from different checks can be told apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    /// Correlation id
    pub id: Uuid,
    /// Authenticated user, if known
    pub user: Option<String>,
}

impl AuthRequest {
    /// Create a request with a fresh correlation id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            user: None,
        }
    }

    /// Set the user label.
    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }
}

impl Default for AuthRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.user {
            Some(user) => write!(f, "{} ({})", self.id, user),
            None => write!(f, "{}", self.id),
        }
    }
}

/// The entity an authorization check concerns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Subject {
    /// A single project
    Project(String),
    /// A group of projects
    Group(String),
}

impl Subject {
    /// Project subject.
    pub fn project(name: &str) -> Self {
        Subject::Project(name.to_string())
    }

    /// Group subject.
    pub fn group(name: &str) -> Self {
        Subject::Group(name.to_string())
    }

    /// Name of the project or group.
    pub fn name(&self) -> &str {
        match self {
            Subject::Project(name) | Subject::Group(name) => name,
        }
    }
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Project(name) => write!(f, "project \"{}\"", name),
            Subject::Group(name) => write!(f, "group \"{}\"", name),
        }
    }
}

/// Authorization plugin trait that all plugins must implement.
///
/// Implementations are untrusted. `load` and `unload` may fail or panic;
/// the adapter absorbs both into its status.
pub trait AuthorizationPlugin: Send + Sync {
    /// Prepare the plugin with its merged configuration.
    fn load(&mut self, config: &PluginConfig) -> PluginResult<()>;

    /// Release whatever `load` acquired.
    fn unload(&mut self) -> PluginResult<()>;

    /// Decide whether `request` may access `subject`.
    fn is_allowed(&self, request: &AuthRequest, subject: &Subject) -> bool;

    /// Stable name used to match this plugin against configured nodes.
    fn type_name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Plugin that grants every check once loaded.
#[derive(Debug, Default)]
pub struct AllowAllPlugin;

impl AuthorizationPlugin for AllowAllPlugin {
    fn load(&mut self, _config: &PluginConfig) -> PluginResult<()> {
        Ok(())
    }

    fn unload(&mut self) -> PluginResult<()> {
        Ok(())
    }

    fn is_allowed(&self, _request: &AuthRequest, _subject: &Subject) -> bool {
        true
    }
}

/// Plugin that denies every check.
#[derive(Debug, Default)]
pub struct DenyAllPlugin;

impl AuthorizationPlugin for DenyAllPlugin {
    fn load(&mut self, _config: &PluginConfig) -> PluginResult<()> {
        Ok(())
    }

    fn unload(&mut self) -> PluginResult<()> {
        Ok(())
    }

    fn is_allowed(&self, _request: &AuthRequest, _subject: &Subject) -> bool {
        false
    }
}

//! Node templates.
//!
//! A template is the immutable identity and configuration of an
//! authorization node. Live adapters are stamped out of it and always start
//! unloaded, so one configured node can be instantiated independently per
//! evaluation context without sharing plugin state.

use crate::authorization::adapter::PluginAdapter;
use crate::authorization::flag::AuthControlFlag;
use crate::core::Result;
use crate::plugin::{AuthorizationPlugin, PluginConfig};
use serde::{Deserialize, Serialize};

/// Identity and configuration of an authorization node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// Type name of the expected plugin
    pub name: String,
    /// Control flag
    pub flag: AuthControlFlag,
    /// Node-level plugin settings
    #[serde(default)]
    pub setup: PluginConfig,
}

impl NodeTemplate {
    /// Create a template with empty setup.
    pub fn new(flag: AuthControlFlag, name: &str) -> Self {
        Self {
            name: name.to_string(),
            flag,
            setup: PluginConfig::new(),
        }
    }

    /// Parse a template from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set a node-level setting.
    pub fn with_setting(mut self, key: &str, value: serde_json::Value) -> Self {
        self.setup.insert(key.to_string(), value);
        self
    }

    /// Fold stack-level settings underneath the node's own.
    ///
    /// Keys already present on the node keep their value.
    pub fn with_inherited_setup(mut self, stack_setup: &PluginConfig) -> Self {
        for (key, value) in stack_setup {
            self.setup
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self
    }

    /// Build an unloaded adapter with no plugin bound.
    pub fn instantiate(&self) -> PluginAdapter {
        PluginAdapter::from_template(self.clone(), None)
    }

    /// Build an unloaded adapter holding `plugin`.
    pub fn instantiate_with(&self, plugin: Box<dyn AuthorizationPlugin>) -> PluginAdapter {
        PluginAdapter::from_template(self.clone(), Some(plugin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorization::PluginStatus;
    use crate::plugin::DenyAllPlugin;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let template = NodeTemplate::from_json(
            r#"{"name": "acme::LdapPlugin", "flag": "requisite", "setup": {"host": "ldap.local"}}"#,
        )
        .unwrap();

        assert_eq!(template.name, "acme::LdapPlugin");
        assert_eq!(template.flag, AuthControlFlag::Requisite);
        assert_eq!(template.setup.get("host"), Some(&json!("ldap.local")));
    }

    #[test]
    fn test_from_json_without_setup() {
        let template = NodeTemplate::from_json(r#"{"name": "pkg.DenyAll", "flag": "optional"}"#).unwrap();
        assert!(template.setup.is_empty());
        assert!(NodeTemplate::from_json(r#"{"name": "x", "flag": "always"}"#).is_err());
    }

    #[test]
    fn test_inherited_setup_node_wins() {
        let mut stack = PluginConfig::new();
        stack.insert("timeout".to_string(), json!(30));
        stack.insert("host".to_string(), json!("stack.local"));

        let template = NodeTemplate::new(AuthControlFlag::Required, "acme::LdapPlugin")
            .with_setting("host", json!("node.local"))
            .with_inherited_setup(&stack);

        assert_eq!(template.setup.get("host"), Some(&json!("node.local")));
        assert_eq!(template.setup.get("timeout"), Some(&json!(30)));
    }

    #[test]
    fn test_instantiate_starts_unloaded() {
        let template = NodeTemplate::new(AuthControlFlag::Sufficient, "pkg.DenyAll");

        let empty = template.instantiate();
        assert_eq!(empty.status(), PluginStatus::Unloaded);
        assert!(!empty.has_plugin());

        let bound = template.instantiate_with(Box::new(DenyAllPlugin));
        assert_eq!(bound.status(), PluginStatus::Unloaded);
        assert!(bound.has_plugin());
        assert_eq!(bound.template(), template);
    }
}

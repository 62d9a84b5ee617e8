//! Plugin registry for managing plugin factories.
//!
//! Maps the stable name of a plugin type to a constructor. Adapters never
//! adopt an instance handed to them; they ask the matching factory for a
//! fresh one so no two nodes share plugin state.

use crate::authorization::PluginAdapter;
use crate::core::{Error, Result};
use crate::plugin::interface::{AuthorizationPlugin, PluginResult};
use std::collections::HashMap;
use std::sync::Arc;

type Constructor = dyn Fn() -> PluginResult<Box<dyn AuthorizationPlugin>> + Send + Sync;

/// Constructor for one plugin type, keyed by the type's stable name.
#[derive(Clone)]
pub struct PluginFactory {
    type_name: String,
    constructor: Arc<Constructor>,
}

impl PluginFactory {
    /// Create a factory from an explicit name and constructor.
    pub fn new<F>(type_name: &str, constructor: F) -> Self
    where
        F: Fn() -> PluginResult<Box<dyn AuthorizationPlugin>> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.to_string(),
            constructor: Arc::new(constructor),
        }
    }

    /// Create a factory for a default-constructible plugin type.
    ///
    /// The key is `std::any::type_name::<P>()`, which is also what
    /// [`AuthorizationPlugin::type_name`] reports by default.
    pub fn of<P>() -> Self
    where
        P: AuthorizationPlugin + Default + 'static,
    {
        Self::new(std::any::type_name::<P>(), || {
            Ok(Box::new(P::default()) as Box<dyn AuthorizationPlugin>)
        })
    }

    /// Name of the plugin type this factory builds.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Build a new instance. May fail or panic; callers must guard it.
    pub fn construct(&self) -> PluginResult<Box<dyn AuthorizationPlugin>> {
        (self.constructor)()
    }
}

impl std::fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginFactory")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Plugin registry.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    /// Registered factories by type name
    factories: HashMap<String, PluginFactory>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory.
    pub fn register(&mut self, factory: PluginFactory) -> Result<()> {
        let name = factory.type_name().to_string();

        if self.factories.contains_key(&name) {
            return Err(Error::DuplicatePlugin(name));
        }

        tracing::debug!(plugin = %name, "Registered plugin factory");
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Register a default-constructible plugin type.
    pub fn register_type<P>(&mut self) -> Result<()>
    where
        P: AuthorizationPlugin + Default + 'static,
    {
        self.register(PluginFactory::of::<P>())
    }

    /// Unregister a factory.
    pub fn unregister(&mut self, type_name: &str) -> Result<PluginFactory> {
        self.factories
            .remove(type_name)
            .ok_or_else(|| Error::PluginNotRegistered(type_name.to_string()))
    }

    /// Get a factory by type name.
    pub fn get(&self, type_name: &str) -> Option<&PluginFactory> {
        self.factories.get(type_name)
    }

    /// Check whether a type name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Get factory count.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Offer the matching factory to every adapter.
    ///
    /// Returns how many adapters ended up with a fresh instance. Adapters
    /// without a registered factory are left alone.
    pub fn rebind_all<'a, I>(&self, adapters: I) -> usize
    where
        I: IntoIterator<Item = &'a PluginAdapter>,
    {
        adapters
            .into_iter()
            .filter(|adapter| {
                self.get(adapter.name())
                    .map(|factory| adapter.rebind(factory))
                    .unwrap_or(false)
            })
            .count()
    }
}

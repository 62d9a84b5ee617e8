//! Plugin adapter: one node of an authorization stack.
//!
//! The adapter owns at most one plugin instance and proxies the stack
//! evaluator's calls to it. Faults raised by the plugin while loading,
//! unloading or being constructed are absorbed into [`PluginStatus`]; a node
//! that is not [`PluginStatus::Working`] denies every check.

use crate::authorization::flag::AuthControlFlag;
use crate::authorization::guard::{self, Fault};
use crate::authorization::template::NodeTemplate;
use crate::core::{now, Timestamp};
use crate::plugin::{AuthRequest, AuthorizationPlugin, PluginConfig, PluginFactory, Subject};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginStatus {
    /// Never loaded, or unloaded since
    Unloaded,
    /// Last load succeeded
    Working,
    /// Last load failed or no plugin was bound
    Failed,
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginStatus::Unloaded => write!(f, "unloaded"),
            PluginStatus::Working => write!(f, "working"),
            PluginStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Point-in-time view of an adapter, for diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdapterSnapshot {
    /// Expected plugin type name
    pub name: String,
    /// Control flag
    pub flag: AuthControlFlag,
    /// Current status
    pub status: PluginStatus,
    /// Whether an instance is bound
    pub has_plugin: bool,
    /// Time of the last status change
    pub last_transition: Timestamp,
}

/// Mutable state, always read and written together.
struct Slot {
    plugin: Option<Box<dyn AuthorizationPlugin>>,
    status: PluginStatus,
    last_transition: Timestamp,
}

impl Slot {
    fn new(plugin: Option<Box<dyn AuthorizationPlugin>>) -> Self {
        Self {
            plugin,
            status: PluginStatus::Unloaded,
            last_transition: now(),
        }
    }

    fn transition(&mut self, status: PluginStatus) {
        self.status = status;
        self.last_transition = now();
    }
}

/// Fault-isolating wrapper around one authorization plugin.
///
/// `load`, `unload` and `rebind` hold the write lock for their whole
/// duration. Checks hold the read lock, so they see the instance and status
/// either before or after a lifecycle call, never in between. Reads are
/// recursive: a predicate may query the adapter it runs under even while a
/// lifecycle call is queued. It must not call `load`, `unload` or `rebind`.
pub struct PluginAdapter {
    template: NodeTemplate,
    slot: RwLock<Slot>,
}

impl PluginAdapter {
    /// Create an adapter expecting the plugin type `name`, with nothing bound.
    pub fn new(flag: AuthControlFlag, name: &str) -> Self {
        Self::from_template(NodeTemplate::new(flag, name), None)
    }

    /// Create an adapter expecting the plugin type `name`, bound to `plugin`.
    pub fn with_plugin(
        flag: AuthControlFlag,
        name: &str,
        plugin: Box<dyn AuthorizationPlugin>,
    ) -> Self {
        Self::from_template(NodeTemplate::new(flag, name), Some(plugin))
    }

    /// Create an adapter named after the plugin's own type name.
    pub fn for_plugin(flag: AuthControlFlag, plugin: Box<dyn AuthorizationPlugin>) -> Self {
        let name = plugin.type_name().to_string();
        Self::with_plugin(flag, &name, plugin)
    }

    /// Create an unloaded adapter from a template.
    pub fn from_template(
        template: NodeTemplate,
        plugin: Option<Box<dyn AuthorizationPlugin>>,
    ) -> Self {
        Self {
            template,
            slot: RwLock::new(Slot::new(plugin)),
        }
    }

    /// Expected plugin type name.
    pub fn name(&self) -> &str {
        &self.template.name
    }

    /// Control flag.
    pub fn flag(&self) -> AuthControlFlag {
        self.template.flag
    }

    /// Node-level plugin settings.
    pub fn setup(&self) -> &PluginConfig {
        &self.template.setup
    }

    /// Identity and configuration of this node.
    pub fn template(&self) -> NodeTemplate {
        self.template.clone()
    }

    /// A new adapter with the same identity and configuration.
    ///
    /// The copy has no plugin bound and starts [`PluginStatus::Unloaded`].
    pub fn duplicate(&self) -> Self {
        Self::from_template(self.template.clone(), None)
    }

    /// Current status.
    pub fn status(&self) -> PluginStatus {
        self.slot.read_recursive().status
    }

    /// Whether an instance is bound and its last load succeeded.
    pub fn is_working(&self) -> bool {
        let slot = self.slot.read_recursive();
        slot.status == PluginStatus::Working && slot.plugin.is_some()
    }

    /// Whether the last load failed.
    pub fn is_failed(&self) -> bool {
        self.slot.read_recursive().status == PluginStatus::Failed
    }

    /// Whether a plugin instance is bound.
    pub fn has_plugin(&self) -> bool {
        self.slot.read_recursive().plugin.is_some()
    }

    /// Consistent view of status and binding.
    pub fn snapshot(&self) -> AdapterSnapshot {
        let slot = self.slot.read_recursive();
        AdapterSnapshot {
            name: self.template.name.clone(),
            flag: self.template.flag,
            status: slot.status,
            has_plugin: slot.plugin.is_some(),
            last_transition: slot.last_transition,
        }
    }

    /// Load the bound plugin.
    ///
    /// The plugin receives `parameters` overlaid with this node's setup;
    /// node settings win on collision. Without a bound plugin, or when the
    /// plugin's load fails in any way, the node becomes
    /// [`PluginStatus::Failed`]. Never fails and never panics.
    pub fn load(&self, parameters: &PluginConfig) {
        let mut slot = self.slot.write();
        let config = self.merged_config(parameters);

        let outcome = slot
            .plugin
            .as_mut()
            .map(|plugin| guard::contain(|| plugin.load(&config)));

        let status = match outcome {
            None => {
                tracing::error!(
                    plugin = %self.template.name,
                    flag = %self.template.flag,
                    "Configured plugin has not been bound (missing factory?); \
                     authorization through this node will always fail"
                );
                PluginStatus::Failed
            }
            Some(Ok(())) => PluginStatus::Working,
            Some(Err(fault)) => {
                self.report_fault("loading", &fault);
                PluginStatus::Failed
            }
        };

        let found = slot.plugin.is_some();
        slot.transition(status);

        tracing::info!(
            flag = %self.template.flag,
            plugin = %self.template.name,
            found,
            status = %status,
            "[{}] Plugin \"{}\" {} and is {}",
            self.template.flag,
            self.template.name,
            if found { "found" } else { "not found" },
            status
        );
    }

    /// Unload and drop the bound plugin.
    ///
    /// The instance is released whether or not its unload routine succeeds.
    /// A no-op when nothing is bound.
    pub fn unload(&self) {
        let mut slot = self.slot.write();
        self.unload_locked(&mut slot);
    }

    /// Run `predicate` against the plugin if this node is working.
    ///
    /// Returns `false` without invoking the predicate when the node is not
    /// [`PluginStatus::Working`]. A panic inside the predicate is logged
    /// and reported as a denial; it does not change the node's status.
    pub fn is_allowed<F>(&self, subject: &Subject, predicate: F) -> bool
    where
        F: FnOnce(&dyn AuthorizationPlugin) -> bool,
    {
        let slot = self.slot.read_recursive();

        if slot.status != PluginStatus::Working {
            tracing::trace!(
                plugin = %self.template.name,
                status = %slot.status,
                subject = %subject,
                "Denied by inactive plugin"
            );
            return false;
        }

        let Some(plugin) = slot.plugin.as_deref() else {
            return false;
        };

        match guard::contain_panic(|| predicate(plugin)) {
            Ok(allowed) => allowed,
            Err(fault) => {
                tracing::error!(
                    plugin = %self.template.name,
                    flag = %self.template.flag,
                    subject = %subject,
                    error = %fault,
                    "Plugin failed while deciding; denying"
                );
                false
            }
        }
    }

    /// Ask the plugin whether `request` may access `subject`.
    pub fn is_allowed_for(&self, request: &AuthRequest, subject: &Subject) -> bool {
        let allowed = self.is_allowed(subject, |plugin| plugin.is_allowed(request, subject));
        tracing::debug!(
            plugin = %self.template.name,
            request = %request,
            subject = %subject,
            allowed,
            "Authorization check"
        );
        allowed
    }

    /// Bind a fresh instance built by `candidate`.
    ///
    /// Only applies when the factory's type name equals this node's name;
    /// otherwise returns `false` and changes nothing. A bound instance is
    /// unloaded first. Construction failures leave the node with nothing
    /// bound and return `false`. Status is left for `load` to set.
    pub fn rebind(&self, candidate: &PluginFactory) -> bool {
        if candidate.type_name() != self.template.name {
            tracing::debug!(
                plugin = %self.template.name,
                candidate = %candidate.type_name(),
                "Rebind skipped, type name differs"
            );
            return false;
        }

        let mut slot = self.slot.write();
        self.unload_locked(&mut slot);

        match guard::contain(|| candidate.construct()) {
            Ok(plugin) => {
                slot.plugin = Some(plugin);
                tracing::info!(
                    plugin = %self.template.name,
                    flag = %self.template.flag,
                    "Bound fresh plugin instance"
                );
                true
            }
            Err(fault) => {
                tracing::info!(
                    plugin = %self.template.name,
                    flag = %self.template.flag,
                    error = %fault,
                    "Plugin could not be instantiated"
                );
                false
            }
        }
    }

    fn unload_locked(&self, slot: &mut Slot) {
        let Some(mut plugin) = slot.plugin.take() else {
            return;
        };

        if let Err(fault) = guard::contain(|| plugin.unload()) {
            self.report_fault("unloading", &fault);
        }
        if let Err(fault) = guard::contain_panic(move || drop(plugin)) {
            self.report_fault("dropping", &fault);
        }

        slot.transition(PluginStatus::Unloaded);
        tracing::info!(
            flag = %self.template.flag,
            plugin = %self.template.name,
            "Plugin unloaded"
        );
    }

    fn merged_config(&self, parameters: &PluginConfig) -> PluginConfig {
        let mut merged = parameters.clone();
        merged.extend(
            self.template
                .setup
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        merged
    }

    fn report_fault(&self, phase: &str, fault: &Fault) {
        tracing::error!(
            plugin = %self.template.name,
            flag = %self.template.flag,
            panicked = fault.is_panic(),
            error = %fault,
            "Plugin \"{}\" has failed while {}",
            self.template.name,
            phase
        );
    }
}

impl std::fmt::Debug for PluginAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.read_recursive();
        f.debug_struct("PluginAdapter")
            .field("name", &self.template.name)
            .field("flag", &self.template.flag)
            .field("status", &slot.status)
            .field("has_plugin", &slot.plugin.is_some())
            .finish()
    }
}

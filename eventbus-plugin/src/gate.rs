//! Plugin enablement

use dashmap::DashSet;
use eventbus_core::{EventBusError, Result};
use std::sync::Arc;
use tracing::debug;

/// Answers whether a plugin was enabled by the application.
pub trait AvailabilityGate: Send + Sync {
    /// Fail with [`EventBusError::PluginNotEnabled`] unless `plugin` is enabled
    fn ensure_enabled(&self, plugin: &str) -> Result<()>;
}

/// Set of enabled plugin names
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    enabled: Arc<DashSet<String>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enable(&self, plugin: impl Into<String>) {
        let plugin = plugin.into();
        debug!("Enabling plugin '{}'", plugin);
        self.enabled.insert(plugin);
    }

    pub fn disable(&self, plugin: &str) {
        if self.enabled.remove(plugin).is_some() {
            debug!("Disabled plugin '{}'", plugin);
        }
    }

    pub fn is_enabled(&self, plugin: &str) -> bool {
        self.enabled.contains(plugin)
    }
}

impl AvailabilityGate for PluginRegistry {
    fn ensure_enabled(&self, plugin: &str) -> Result<()> {
        if self.is_enabled(plugin) {
            Ok(())
        } else {
            Err(EventBusError::PluginNotEnabled(plugin.to_string()))
        }
    }
}

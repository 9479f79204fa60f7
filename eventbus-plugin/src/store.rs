//! Deferred handler registrations
//!
//! Bindings declared before the event bus exists are buffered here, keyed by
//! plugin name and a sub-key, and drained when the plugin activates.

use dashmap::DashMap;
use eventbus_core::{Handler, HandlerEntry, Result};
use std::sync::Arc;
use tracing::debug;

use crate::gate::AvailabilityGate;

/// Sub-key under which event handler declarations are stored
pub const INTERNAL_EVENT_HANDLERS: &str = "internal_event_handlers";

/// Declaration buffer keyed by `(plugin, sub_key)`
#[derive(Debug, Clone, Default)]
pub struct PluginRegistryStore {
    entries: Arc<DashMap<(String, String), Vec<HandlerEntry>>>,
}

impl PluginRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration, keeping declaration order
    pub fn add(&self, plugin: &str, key: &str, entry: HandlerEntry) {
        self.entries
            .entry((plugin.to_string(), key.to_string()))
            .or_default()
            .push(entry);
    }

    /// Remove and return every declaration under `(plugin, key)`
    pub fn take(&self, plugin: &str, key: &str) -> Vec<HandlerEntry> {
        self.entries
            .remove(&(plugin.to_string(), key.to_string()))
            .map(|(_, entries)| entries)
            .unwrap_or_default()
    }

    pub fn len(&self, plugin: &str, key: &str) -> usize {
        self.entries
            .get(&(plugin.to_string(), key.to_string()))
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

/// Declare an event handler before the event bus is running.
///
/// The declaration is rejected when `plugin` has not been enabled or the event
/// name is empty. It takes effect once the plugin activates.
///
/// ```rust,ignore
/// on_internal_event(&plugins, &store, "eventbus", "user_created",
///     Handler::blocking(send_welcome_email))?;
/// ```
pub fn on_internal_event(
    gate: &dyn AvailabilityGate,
    store: &PluginRegistryStore,
    plugin: &str,
    event_name: impl Into<String>,
    handler: Handler,
) -> Result<()> {
    gate.ensure_enabled(plugin)?;

    let entry = HandlerEntry::new(event_name, handler)?;
    debug!(
        "Declared handler '{}' for event '{}'",
        entry.handler().name(),
        entry.event_name()
    );
    store.add(plugin, INTERNAL_EVENT_HANDLERS, entry);

    Ok(())
}

//! The event bus plugin and its public accessor

use crate::gate::AvailabilityGate;
use crate::store::{INTERNAL_EVENT_HANDLERS, PluginRegistryStore};
use eventbus_core::{EventBus, EventBusConfig, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Owns the live event bus and loads declared handlers into it once.
#[derive(Debug)]
pub struct EventBusPlugin {
    bus: EventBus,
    activated: AtomicBool,
}

impl EventBusPlugin {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            bus: EventBus::with_config(config),
            activated: AtomicBool::new(false),
        }
    }

    /// Name the plugin is enabled and declared under
    pub fn public_name(&self) -> &str {
        &self.bus.config().plugin_name
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn is_activated(&self) -> bool {
        self.activated.load(Ordering::Acquire)
    }

    /// Move this plugin's declared handlers from `store` into the bus.
    ///
    /// Handlers are registered in declaration order. Only the first call
    /// drains the store; later calls register nothing and return `Ok(0)`.
    pub fn activate(&self, store: &PluginRegistryStore) -> Result<usize> {
        if self
            .activated
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Plugin '{}' already activated", self.public_name());
            return Ok(0);
        }

        let entries = store.take(self.public_name(), INTERNAL_EVENT_HANDLERS);
        let count = entries.len();
        for entry in entries {
            self.bus.registry().register_entry(entry);
        }

        info!(
            "Plugin '{}' activated with {} declared handlers",
            self.public_name(),
            count
        );
        Ok(count)
    }
}

impl Default for EventBusPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the live event bus.
///
/// Fails with [`EventBusError::PluginNotEnabled`](eventbus_core::EventBusError::PluginNotEnabled)
/// if the plugin was never enabled.
pub fn eventbus_api(gate: &dyn AvailabilityGate, plugin: &EventBusPlugin) -> Result<EventBus> {
    gate.ensure_enabled(plugin.public_name())?;
    Ok(plugin.bus().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::PluginRegistry;
    use crate::store::on_internal_event;
    use eventbus_core::{EventBusError, Handler};

    fn noop(name: &str) -> Handler {
        Handler::blocking(|_args| Ok(())).with_name(name)
    }

    #[test]
    fn test_activate_drains_declarations_in_order() {
        let plugins = PluginRegistry::new();
        let store = PluginRegistryStore::new();
        let plugin = EventBusPlugin::new();
        plugins.enable(plugin.public_name());

        for name in ["h1", "h2", "h3"] {
            on_internal_event(&plugins, &store, plugin.public_name(), "greet", noop(name)).unwrap();
        }

        assert_eq!(plugin.activate(&store).unwrap(), 3);
        assert!(plugin.is_activated());

        let names: Vec<String> = plugin
            .bus()
            .registry()
            .lookup("greet")
            .iter()
            .map(|h| h.name().to_string())
            .collect();
        assert_eq!(names, vec!["h1", "h2", "h3"]);
    }

    #[test]
    fn test_second_activation_registers_nothing() {
        let plugins = PluginRegistry::new();
        let store = PluginRegistryStore::new();
        let plugin = EventBusPlugin::new();
        plugins.enable(plugin.public_name());

        on_internal_event(&plugins, &store, plugin.public_name(), "greet", noop("h1")).unwrap();
        plugin.activate(&store).unwrap();

        // Declared after activation: stays in the store
        on_internal_event(&plugins, &store, plugin.public_name(), "greet", noop("h2")).unwrap();
        assert_eq!(plugin.activate(&store).unwrap(), 0);
        assert_eq!(plugin.bus().handler_count("greet"), 1);
    }

    #[test]
    fn test_accessor_requires_enabled_plugin() {
        let plugins = PluginRegistry::new();
        let plugin = EventBusPlugin::new();

        assert!(matches!(
            eventbus_api(&plugins, &plugin),
            Err(EventBusError::PluginNotEnabled(_))
        ));

        plugins.enable(plugin.public_name());
        let bus = eventbus_api(&plugins, &plugin).unwrap();
        bus.subscribe("greet", noop("h1")).unwrap();

        // The accessor hands out the live bus, not a copy of its registry
        assert_eq!(plugin.bus().handler_count("greet"), 1);
    }

    #[test]
    fn test_accessor_bus_emits() {
        let plugins = PluginRegistry::new();
        let plugin = EventBusPlugin::new();
        plugins.enable(plugin.public_name());

        let bus = eventbus_api(&plugins, &plugin).unwrap();
        let result = tokio_test::block_on(bus.emit_empty("silence"));
        assert!(result.is_ok());
    }
}

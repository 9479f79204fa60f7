//! Application wiring for the event bus plugin
//!
//! Boot happens in two phases:
//!
//! 1. **Declaration** - handlers are declared with [`Application::declare`]
//!    and buffered in the plugin store.
//! 2. **Activation** - [`Application::start`] drains the buffer into the bus.
//!
//! ```rust,ignore
//! let app = Application::new();
//! app.enable_eventbus();
//! app.declare("user_created", Handler::blocking(send_welcome_email))?;
//! app.start()?;
//!
//! app.eventbus()?.emit("user_created", args).await?;
//! ```

use crate::gate::{AvailabilityGate, PluginRegistry};
use crate::plugin::{EventBusPlugin, eventbus_api};
use crate::store::{PluginRegistryStore, on_internal_event};
use eventbus_core::{EventBus, EventBusConfig, Handler, Result};
use tracing::info;

/// Holds the plugin registry, the declaration store and the event bus plugin
#[derive(Debug, Default)]
pub struct Application {
    plugins: PluginRegistry,
    store: PluginRegistryStore,
    eventbus: EventBusPlugin,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            plugins: PluginRegistry::new(),
            store: PluginRegistryStore::new(),
            eventbus: EventBusPlugin::with_config(config),
        }
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn store(&self) -> &PluginRegistryStore {
        &self.store
    }

    pub fn eventbus_plugin(&self) -> &EventBusPlugin {
        &self.eventbus
    }

    /// Enable the event bus plugin
    pub fn enable_eventbus(&self) {
        self.plugins.enable(self.eventbus.public_name());
    }

    /// Declare a handler to be registered when the application starts
    pub fn declare(&self, event_name: impl Into<String>, handler: Handler) -> Result<()> {
        on_internal_event(
            &self.plugins,
            &self.store,
            self.eventbus.public_name(),
            event_name,
            handler,
        )
    }

    /// Activate the event bus plugin, registering every declared handler.
    ///
    /// Returns the number of handlers registered by this call.
    pub fn start(&self) -> Result<usize> {
        self.plugins.ensure_enabled(self.eventbus.public_name())?;
        let registered = self.eventbus.activate(&self.store)?;
        info!("Application started");
        Ok(registered)
    }

    /// The live event bus; fails if the plugin is not enabled
    pub fn eventbus(&self) -> Result<EventBus> {
        eventbus_api(&self.plugins, &self.eventbus)
    }
}

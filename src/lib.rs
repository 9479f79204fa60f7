// Opinionated Eventbus - in-process named-event dispatcher
//
// Handlers subscribe to event names; emitting a name runs every subscriber
// concurrently (blocking handlers on worker threads, async handlers as tasks)
// and reports all failures as a single error.

// Re-export core functionality
pub use eventbus_core::*;

// Re-export plugin wiring
pub use eventbus_plugin::{
    Application, AvailabilityGate, EventBusPlugin, INTERNAL_EVENT_HANDLERS, PluginRegistry,
    PluginRegistryStore, eventbus_api, on_internal_event,
};

pub use async_trait::async_trait;
pub use serde_json::{Value, json};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Application, EventArgs, EventBus, EventBusBuilder, EventBusError, EventHandler, Handler,
        HandlerResult, async_trait, eventbus_api, json,
    };
}

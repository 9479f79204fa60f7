//! Plugin wiring for the event bus
//!
//! Connects [`eventbus_core::EventBus`] to the surrounding application:
//!
//! - **Enablement** - [`PluginRegistry`] gates access to the bus
//! - **Deferred registration** - [`on_internal_event`] buffers handlers
//!   declared before the bus is running
//! - **Activation** - [`EventBusPlugin::activate`] loads them exactly once
//! - **Accessor** - [`eventbus_api`] is the sanctioned way to reach the bus

pub mod application;
pub mod gate;
pub mod plugin;
pub mod store;

pub use application::Application;
pub use gate::{AvailabilityGate, PluginRegistry};
pub use plugin::{EventBusPlugin, eventbus_api};
pub use store::{INTERNAL_EVENT_HANDLERS, PluginRegistryStore, on_internal_event};

//! Handler registry
//!
//! Maps event names to the handlers bound to them. Entries are append-only;
//! per-event order is registration order.

use crate::error::RegistrationError;
use crate::handler::{Handler, HandlerEntry};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Event name to handler list mapping
#[derive(Clone)]
pub struct Registry {
    handlers: Arc<DashMap<String, Vec<Handler>>>,
    enable_logging: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_logging(true)
    }

    pub fn with_logging(enable_logging: bool) -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
            enable_logging,
        }
    }

    /// Append a handler for an event.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let registry = Registry::new();
    /// registry.register("user_created", Handler::blocking(send_welcome_email))?;
    /// ```
    pub fn register(
        &self,
        event_name: impl Into<String>,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.register_entry(HandlerEntry::new(event_name, handler)?);
        Ok(())
    }

    /// Append a prebuilt binding
    pub fn register_entry(&self, entry: HandlerEntry) {
        let (event_name, handler) = entry.into_parts();

        if self.enable_logging {
            info!(
                "Registered handler '{}' for event '{}'",
                handler.name(),
                event_name
            );
        }

        self.handlers.entry(event_name).or_default().push(handler);
    }

    /// Handlers for an event, in registration order. Empty when none.
    pub fn lookup(&self, event_name: &str) -> Vec<Handler> {
        self.handlers
            .get(event_name)
            .map(|handlers| handlers.value().clone())
            .unwrap_or_default()
    }

    pub fn handler_count(&self, event_name: &str) -> usize {
        self.handlers
            .get(event_name)
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }

    /// Event names with at least one handler, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Total number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("events", &self.event_names())
            .field("handlers", &self.len())
            .finish()
    }
}

//! Event Bus implementation

use crate::error::{EventBusError, HandlerFailure, HandlerFailures, Result};
use crate::handler::{
    EmitInvocation, EventArgs, EventHandler, Handler, HandlerKind, HandlerResult,
};
use crate::registry::Registry;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info};

/// Name used in errors when no plugin name is configured
pub const DEFAULT_PLUGIN_NAME: &str = "eventbus";

/// Event bus for in-process event publishing and handling
///
/// Cloning is cheap; clones share the same registry.
#[derive(Clone)]
pub struct EventBus {
    /// Handlers registered for each event name
    registry: Registry,

    /// Configuration
    config: Arc<EventBusConfig>,
}

/// Event bus configuration
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Enable registration and emission logging
    pub enable_logging: bool,

    /// Public name of the owning plugin, reported in emit errors
    pub plugin_name: String,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            plugin_name: DEFAULT_PLUGIN_NAME.to_string(),
        }
    }
}

impl EventBus {
    /// Create new event bus
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create event bus with custom config
    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            registry: Registry::with_logging(config.enable_logging),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Subscribe a handler to an event name
    pub fn subscribe(&self, event_name: impl Into<String>, handler: Handler) -> Result<()> {
        self.registry.register(event_name, handler)?;
        Ok(())
    }

    /// Subscribe a synchronous function; it runs on the blocking pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// bus.subscribe_blocking("greet", |args| {
    ///     println!("hello {:?}", args.get(0));
    ///     Ok(())
    /// })?;
    /// ```
    pub fn subscribe_blocking<F>(&self, event_name: impl Into<String>, f: F) -> Result<()>
    where
        F: Fn(&EventArgs) -> HandlerResult + Send + Sync + 'static,
    {
        self.subscribe(event_name, Handler::blocking(f))
    }

    /// Subscribe an async function
    pub fn subscribe_async<F, Fut>(&self, event_name: impl Into<String>, f: F) -> Result<()>
    where
        F: Fn(Arc<EventArgs>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.subscribe(event_name, Handler::non_blocking(f))
    }

    /// Subscribe an [`EventHandler`] implementation
    pub fn subscribe_handler<H>(&self, event_name: impl Into<String>, handler: H) -> Result<()>
    where
        H: EventHandler + 'static,
    {
        self.subscribe(event_name, Handler::from_handler(handler))
    }

    /// Emit an event
    ///
    /// Every handler registered for `event_name` is started concurrently with
    /// the same arguments, then all of them are awaited. Emitting an event
    /// nobody listens to succeeds without doing anything.
    ///
    /// If any handler fails, the remaining ones still run to completion and
    /// the returned error lists every failure.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// bus.emit("greet", EventArgs::new().arg("hello")).await?;
    /// ```
    pub async fn emit(&self, event_name: &str, args: impl Into<EventArgs>) -> Result<()> {
        let invocation = EmitInvocation::new(event_name, args.into());
        let handlers = self.registry.lookup(event_name);

        if self.config.enable_logging {
            info!(
                emit_id = %invocation.id,
                "Emitting '{}' to {} handlers",
                event_name,
                handlers.len()
            );
        }

        if handlers.is_empty() {
            return Ok(());
        }

        // Everything is scheduled before anything is awaited
        let (names, tasks): (Vec<String>, Vec<JoinHandle<HandlerResult>>) = handlers
            .iter()
            .map(|handler| {
                (
                    handler.name().to_string(),
                    Self::dispatch(handler, &invocation.args),
                )
            })
            .unzip();

        let outcomes = join_all(tasks).await;

        let mut failures = Vec::new();
        for (name, outcome) in names.into_iter().zip(outcomes) {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!(
                        emit_id = %invocation.id,
                        "Handler '{}' failed on event '{}': {:?}",
                        name,
                        event_name,
                        e
                    );
                    failures.push(HandlerFailure::failed(name, e));
                }
                Err(e) => {
                    let message = panic_message(e);
                    error!(
                        emit_id = %invocation.id,
                        "Handler '{}' panicked on event '{}': {}",
                        name,
                        event_name,
                        message
                    );
                    failures.push(HandlerFailure::panicked(name, message));
                }
            }
        }

        if !failures.is_empty() {
            return Err(EventBusError::EmitFailed {
                plugin: self.config.plugin_name.clone(),
                event: event_name.to_string(),
                failures: HandlerFailures::new(failures),
            });
        }

        if self.config.enable_logging {
            debug!(
                emit_id = %invocation.id,
                "Event '{}' handled in {}ms",
                event_name,
                (chrono::Utc::now() - invocation.emitted_at).num_milliseconds()
            );
        }

        Ok(())
    }

    /// Emit an event without arguments
    pub async fn emit_empty(&self, event_name: &str) -> Result<()> {
        self.emit(event_name, EventArgs::new()).await
    }

    /// Get handler count for an event name
    pub fn handler_count(&self, event_name: &str) -> usize {
        self.registry.handler_count(event_name)
    }

    fn dispatch(handler: &Handler, args: &Arc<EventArgs>) -> JoinHandle<HandlerResult> {
        match handler.kind() {
            HandlerKind::NonBlocking(f) => {
                let f = Arc::clone(f);
                let args = Arc::clone(args);
                tokio::spawn(async move { f(args).await })
            }
            HandlerKind::Blocking(f) => {
                let f = Arc::clone(f);
                let args = Arc::clone(args);
                tokio::task::spawn_blocking(move || f(&args))
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

fn panic_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Event bus builder
pub struct EventBusBuilder {
    config: EventBusConfig,
}

impl EventBusBuilder {
    /// Create new event bus builder
    pub fn new() -> Self {
        Self {
            config: EventBusConfig::default(),
        }
    }

    /// Enable/disable logging
    pub fn enable_logging(mut self, enabled: bool) -> Self {
        self.config.enable_logging = enabled;
        self
    }

    /// Set the plugin name reported in emit errors
    pub fn plugin_name(mut self, name: impl Into<String>) -> Self {
        self.config.plugin_name = name.into();
        self
    }

    /// Build the event bus
    pub fn build(self) -> EventBus {
        EventBus::with_config(self.config)
    }
}

impl Default for EventBusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

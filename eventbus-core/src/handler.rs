//! Handler definitions and the argument payload they receive

use crate::error::RegistrationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use uuid::Uuid;

/// Error returned by a handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type every handler produces.
pub type HandlerResult = Result<(), HandlerError>;

/// Ordinary synchronous callable, run on the blocking pool.
pub type BlockingFn = Arc<dyn Fn(&EventArgs) -> HandlerResult + Send + Sync>;

/// Callable producing a future, run as a task on the runtime.
pub type NonBlockingFn =
    Arc<dyn Fn(Arc<EventArgs>) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// Arguments forwarded unchanged to every handler of an emit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventArgs {
    /// Positional arguments, in call order
    pub positional: Vec<Value>,

    /// Keyword arguments
    pub keyword: Map<String, Value>,
}

impl EventArgs {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Set a keyword argument
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(key.into(), value.into());
        self
    }

    /// Get a positional argument by index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Get a keyword argument by name
    pub fn get_kwarg(&self, key: &str) -> Option<&Value> {
        self.keyword.get(key)
    }

    /// Total number of positional and keyword arguments
    pub fn len(&self) -> usize {
        self.positional.len() + self.keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for EventArgs {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keyword: Map::new(),
        }
    }
}

impl From<Map<String, Value>> for EventArgs {
    fn from(keyword: Map<String, Value>) -> Self {
        Self {
            positional: Vec::new(),
            keyword,
        }
    }
}

/// Async handler trait
///
/// Types implementing this trait are registered as non-blocking handlers.
///
/// ```rust,ignore
/// struct AuditHandler;
///
/// #[async_trait]
/// impl EventHandler for AuditHandler {
///     async fn handle(&self, args: &EventArgs) -> HandlerResult {
///         audit_log::write(args).await?;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one emit
    async fn handle(&self, args: &EventArgs) -> HandlerResult;

    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// How a handler is executed, decided once when the handler is built.
#[derive(Clone)]
pub enum HandlerKind {
    /// Synchronous callable, offloaded to a worker thread
    Blocking(BlockingFn),

    /// Natively asynchronous callable, spawned on the runtime
    NonBlocking(NonBlockingFn),
}

/// A registered unit of work with a diagnostic name.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    kind: HandlerKind,
}

impl Handler {
    /// Wrap a synchronous function.
    ///
    /// The function runs on tokio's blocking pool so that it cannot stall
    /// tasks sharing the runtime.
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn(&EventArgs) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(std::any::type_name::<F>()),
            kind: HandlerKind::Blocking(Arc::new(f)),
        }
    }

    /// Wrap a function returning a future.
    pub fn non_blocking<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<EventArgs>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            name: Arc::from(std::any::type_name::<F>()),
            kind: HandlerKind::NonBlocking(Arc::new(
                move |args: Arc<EventArgs>| -> BoxFuture<'static, HandlerResult> {
                    f(args).boxed()
                },
            )),
        }
    }

    /// Wrap an [`EventHandler`] implementation.
    pub fn from_handler<H: EventHandler + 'static>(handler: H) -> Self {
        let name: Arc<str> = Arc::from(handler.name());
        let handler = Arc::new(handler);

        Self {
            name,
            kind: HandlerKind::NonBlocking(Arc::new(
                move |args: Arc<EventArgs>| -> BoxFuture<'static, HandlerResult> {
                    let handler = Arc::clone(&handler);
                    async move { handler.handle(&args).await }.boxed()
                },
            )),
        }
    }

    /// Override the diagnostic name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name: String = name.into();
        self.name = Arc::from(name);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self.kind, HandlerKind::Blocking(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_blocking() {
            "blocking"
        } else {
            "non-blocking"
        };
        f.debug_struct("Handler")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

/// Binding of a handler to an event name.
#[derive(Debug, Clone)]
pub struct HandlerEntry {
    event_name: String,
    handler: Handler,
}

impl HandlerEntry {
    /// Create a binding; the event name must not be empty.
    pub fn new(
        event_name: impl Into<String>,
        handler: Handler,
    ) -> Result<Self, RegistrationError> {
        let event_name = event_name.into();
        if event_name.is_empty() {
            return Err(RegistrationError::EmptyEventName);
        }
        Ok(Self {
            event_name,
            handler,
        })
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn into_parts(self) -> (String, Handler) {
        (self.event_name, self.handler)
    }
}

/// A single emit call. Built per call and dropped once it completes.
#[derive(Debug, Clone)]
pub struct EmitInvocation {
    /// Correlation ID for log lines of this emit
    pub id: Uuid,

    /// Event being emitted
    pub event_name: String,

    /// Payload shared by all handlers
    pub args: Arc<EventArgs>,

    /// When the emit started
    pub emitted_at: DateTime<Utc>,
}

impl EmitInvocation {
    pub fn new(event_name: impl Into<String>, args: EventArgs) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_name: event_name.into(),
            args: Arc::new(args),
            emitted_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct NamedHandler;

    #[async_trait]
    impl EventHandler for NamedHandler {
        async fn handle(&self, _args: &EventArgs) -> HandlerResult {
            Ok(())
        }

        fn name(&self) -> &str {
            "named"
        }
    }

    #[test]
    fn test_event_args_builder() {
        let args = EventArgs::new().arg("hello").arg(42).kwarg("lang", "en");

        assert_eq!(args.get(0), Some(&json!("hello")));
        assert_eq!(args.get(1), Some(&json!(42)));
        assert_eq!(args.get_kwarg("lang"), Some(&json!("en")));
        assert_eq!(args.len(), 3);
        assert!(!args.is_empty());
        assert!(EventArgs::new().is_empty());
    }

    #[test]
    fn test_handler_classification() {
        let blocking = Handler::blocking(|_args| Ok(()));
        let non_blocking = Handler::non_blocking(|_args| async { Ok(()) });

        assert!(blocking.is_blocking());
        assert!(!non_blocking.is_blocking());
        assert!(matches!(non_blocking.kind(), HandlerKind::NonBlocking(_)));
    }

    #[test]
    fn test_handler_names() {
        let handler = Handler::blocking(|_args| Ok(())).with_name("send_welcome_email");
        assert_eq!(handler.name(), "send_welcome_email");

        let handler = Handler::from_handler(NamedHandler);
        assert_eq!(handler.name(), "named");
        assert!(!handler.is_blocking());
    }

    #[test]
    fn test_handler_entry_rejects_empty_event_name() {
        let result = HandlerEntry::new("", Handler::blocking(|_args| Ok(())));
        assert!(matches!(result, Err(RegistrationError::EmptyEventName)));

        let entry = HandlerEntry::new("user_created", Handler::blocking(|_args| Ok(()))).unwrap();
        assert_eq!(entry.event_name(), "user_created");
    }

    #[test]
    fn test_from_handler_invokes_trait() {
        let handler = Handler::from_handler(NamedHandler);
        let HandlerKind::NonBlocking(f) = handler.kind() else {
            panic!("expected non-blocking handler");
        };
        assert!(tokio_test::block_on(f(Arc::new(EventArgs::new()))).is_ok());
    }
}

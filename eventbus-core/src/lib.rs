//! In-process named-event dispatcher
//!
//! Handlers subscribe to an event name; emitting the name runs every
//! subscribed handler concurrently and waits for all of them.
//!
//! ## Features
//!
//! - **Registry** - Append-only event name to handler mapping
//! - **Two handler kinds** - Blocking functions run on the blocking pool,
//!   async functions run as tasks
//! - **Wait-for-all** - A failing handler never leaves others unobserved
//! - **Error chaining** - Emit errors keep every underlying handler error
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use eventbus_core::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bus = EventBus::new();
//!
//!     // Ordinary function, offloaded to a worker thread
//!     bus.subscribe_blocking("user_created", |args| {
//!         println!("Sending welcome email to {:?}", args.get_kwarg("email"));
//!         Ok(())
//!     })?;
//!
//!     // Async function, spawned on the runtime
//!     bus.subscribe_async("user_created", |args| async move {
//!         analytics::track("signup", &args).await?;
//!         Ok(())
//!     })?;
//!
//!     bus.emit("user_created", EventArgs::new().kwarg("email", "alice@example.com"))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! ```rust,ignore
//! match bus.emit("user_created", args).await {
//!     Ok(()) => println!("All handlers succeeded (or none were registered)"),
//!     Err(EventBusError::EmitFailed { event, failures, .. }) => {
//!         for failure in &failures {
//!             eprintln!("{}: {}", event, failure);
//!         }
//!     }
//!     Err(e) => eprintln!("Emit error: {}", e),
//! }
//! ```

pub mod bus;
pub mod error;
pub mod handler;
pub mod registry;

pub use bus::{DEFAULT_PLUGIN_NAME, EventBus, EventBusBuilder, EventBusConfig};
pub use error::{
    EventBusError, FailureKind, HandlerFailure, HandlerFailures, RegistrationError, Result,
};
pub use handler::{
    BlockingFn, EmitInvocation, EventArgs, EventHandler, Handler, HandlerEntry, HandlerError,
    HandlerKind, HandlerResult, NonBlockingFn,
};
pub use registry::Registry;

//! Error types for registration and dispatch

use crate::handler::HandlerError;
use std::error::Error;
use std::fmt;

/// Rejected handler registration
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Event name must not be empty")]
    EmptyEventName,
}

/// Event bus errors
#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    /// The event bus plugin was never enabled
    #[error("Plugin '{0}' is not enabled")]
    PluginNotEnabled(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// One or more handlers failed during a single emit
    #[error("[{plugin}] Error emitting event '{event}': {failures}")]
    EmitFailed {
        plugin: String,
        event: String,
        #[source]
        failures: HandlerFailures,
    },
}

impl EventBusError {
    /// Handler failures, if this is an emit error
    pub fn failures(&self) -> Option<&HandlerFailures> {
        match self {
            EventBusError::EmitFailed { failures, .. } => Some(failures),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, EventBusError>;

/// Why a handler did not complete
#[derive(Debug)]
pub enum FailureKind {
    /// The handler returned an error
    Failed(HandlerError),

    /// The handler panicked or its task was aborted
    Panicked(String),
}

/// A single failed handler of an emit
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: String,
    pub kind: FailureKind,
}

impl HandlerFailure {
    pub fn failed(handler: impl Into<String>, error: HandlerError) -> Self {
        Self {
            handler: handler.into(),
            kind: FailureKind::Failed(error),
        }
    }

    pub fn panicked(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            kind: FailureKind::Panicked(message.into()),
        }
    }

    /// The error the handler returned, if it returned one
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match &self.kind {
            FailureKind::Failed(err) => Some(err.as_ref()),
            FailureKind::Panicked(_) => None,
        }
    }
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::Failed(err) => write!(f, "handler '{}' failed: {}", self.handler, err),
            FailureKind::Panicked(msg) => {
                write!(f, "handler '{}' panicked: {}", self.handler, msg)
            }
        }
    }
}

impl Error for HandlerFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            FailureKind::Failed(err) => Some(&**err),
            FailureKind::Panicked(_) => None,
        }
    }
}

/// Every failure captured during one emit, in registration order.
///
/// `source()` points at the first failure, which in turn chains to the
/// error its handler returned.
#[derive(Debug)]
pub struct HandlerFailures(Vec<HandlerFailure>);

impl HandlerFailures {
    pub fn new(failures: Vec<HandlerFailure>) -> Self {
        Self(failures)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HandlerFailure> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&HandlerFailure> {
        self.0.first()
    }

    pub fn into_inner(self) -> Vec<HandlerFailure> {
        self.0
    }
}

impl fmt::Display for HandlerFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "no handler failures"),
            [single] => write!(f, "{}", single),
            many => {
                write!(f, "{} handlers failed: ", many.len())?;
                for (i, failure) in many.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}", failure)?;
                }
                Ok(())
            }
        }
    }
}

impl Error for HandlerFailures {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.first().map(|failure| failure as &(dyn Error + 'static))
    }
}

impl<'a> IntoIterator for &'a HandlerFailures {
    type Item = &'a HandlerFailure;
    type IntoIter = std::slice::Iter<'a, HandlerFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

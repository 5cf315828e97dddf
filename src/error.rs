//! Error types used by the event provider and its listeners.
//!
//! This module defines the error enums of the crate:
//!
//! - [`EventError`]: caller-visible failures of provider operations (lifecycle
//!   violations, unknown event types, duplicates, a saturated async queue).
//! - [`ListenerError`]: failures returned by listener implementations.
//! - [`ListenerInvocationError`]: a captured listener failure as handed to the
//!   [`FailureReporter`](crate::FailureReporter). Never returned from `fire_event`.
//! - [`ConfigError`]: malformed values in a module configuration map.
//!
//! All of them provide `as_label` for logs/metrics.

use thiserror::Error;

use crate::events::{DispatchMode, Scope};

/// # Errors produced by [`EventProvider`](crate::EventProvider) operations.
///
/// Lifecycle and structural errors always fail the specific call and are never
/// retried by the provider.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// An operation was called before [`init`](crate::EventProvider::init).
    #[error("event provider is not initialized")]
    NotInitialized,

    /// [`init`](crate::EventProvider::init) was called on a ready provider.
    #[error("event provider is already initialized")]
    AlreadyInitialized,

    /// The provider was destroyed; all further operations are rejected.
    #[error("event provider has been destroyed")]
    Destroyed,

    /// A listener was registered for an event type never declared in the scope.
    #[error("unknown event type {event_type} in scope '{scope}'")]
    UnknownEventType {
        /// Scope the call targeted.
        scope: Scope,
        /// Debug rendering of the event type key.
        event_type: String,
    },

    /// The same listener instance is already registered for this event type.
    #[error("listener '{listener}' is already registered for {event_type} in scope '{scope}'")]
    DuplicateListener {
        /// Scope the call targeted.
        scope: Scope,
        /// Debug rendering of the event type key.
        event_type: String,
        /// Name of the rejected listener.
        listener: &'static str,
    },

    /// The async dispatch queue was full and the saturation policy is `Reject`.
    ///
    /// Listeners named here did not receive the event; every other listener did.
    #[error("async dispatch queue full (capacity {capacity}); rejected: {rejected:?}")]
    DispatchQueueFull {
        /// Configured queue capacity.
        capacity: usize,
        /// Names of the listeners whose submission was rejected.
        rejected: Vec<&'static str>,
    },
}

impl EventError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::EventError;
    ///
    /// assert_eq!(EventError::Destroyed.as_label(), "provider_destroyed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            EventError::NotInitialized => "provider_not_initialized",
            EventError::AlreadyInitialized => "provider_already_initialized",
            EventError::Destroyed => "provider_destroyed",
            EventError::UnknownEventType { .. } => "unknown_event_type",
            EventError::DuplicateListener { .. } => "duplicate_listener",
            EventError::DispatchQueueFull { .. } => "dispatch_queue_full",
        }
    }

    /// True for errors caused by the provider's lifecycle state.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            EventError::NotInitialized | EventError::AlreadyInitialized | EventError::Destroyed
        )
    }
}

/// # Errors returned by listener implementations.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// The listener could not handle the event.
    #[error("listener failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },
}

impl ListenerError {
    /// Shorthand for [`ListenerError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        ListenerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ListenerError::Fail { .. } => "listener_failed",
        }
    }
}

/// How a listener invocation went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationFailure {
    /// The listener returned an error.
    Returned(ListenerError),
    /// The listener panicked; carries the panic message when it was a string.
    Panicked(String),
}

impl std::fmt::Display for InvocationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvocationFailure::Returned(err) => write!(f, "{err}"),
            InvocationFailure::Panicked(info) => write!(f, "panicked: {info}"),
        }
    }
}

/// # A captured failure of one listener during one dispatch.
///
/// Built by the provider for SYNC and ASYNC invocations alike and delivered to
/// the configured [`FailureReporter`](crate::FailureReporter).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("listener '{listener}' failed on {event_type} in scope '{scope}' ({mode}): {cause}")]
pub struct ListenerInvocationError {
    /// Name of the failing listener.
    pub listener: &'static str,
    /// Scope of the fired event.
    pub scope: Scope,
    /// Debug rendering of the fired event type.
    pub event_type: String,
    /// Mode the listener was registered with.
    pub mode: DispatchMode,
    /// Sequence number of the fired context.
    pub seq: u64,
    /// What went wrong.
    pub cause: InvocationFailure,
}

impl ListenerInvocationError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match &self.cause {
            InvocationFailure::Returned(err) => err.as_label(),
            InvocationFailure::Panicked(_) => "listener_panicked",
        }
    }

    /// True if the listener panicked rather than returning an error.
    pub fn is_panic(&self) -> bool {
        matches!(self.cause, InvocationFailure::Panicked(_))
    }
}

/// # Errors produced while reading a module configuration map.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A key carried a value that could not be parsed or is out of range.
    #[error("invalid value {value:?} for '{key}': expected {expected}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Raw value as found in the map.
        value: String,
        /// What the key accepts.
        expected: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidValue { .. } => "config_invalid_value",
        }
    }
}

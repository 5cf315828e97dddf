//! # Event context handed to listeners.
//!
//! An [`EventContext`] describes one firing: which scope owns the event, which
//! event type is fired, and an arbitrary payload. It is immutable once built;
//! the provider wraps it in an `Arc` so that SYNC listeners of one fire observe
//! the very same instance and ASYNC listeners can share it across workers.
//!
//! ## Ordering guarantees
//! Each context gets a process-wide sequence number (`seq`) that increases
//! monotonically with construction order. Use it to restore firing order when
//! ASYNC listeners complete out of order.
//!
//! ## Example
//! ```rust
//! use eventvisor::{EventContext, Scope};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum OrderEvent { Created }
//!
//! let ctx = EventContext::new("orders", OrderEvent::Created, 42_u64);
//! assert_eq!(ctx.scope(), &Scope::from("orders"));
//! assert_eq!(ctx.event_type(), &OrderEvent::Created);
//! assert_eq!(*ctx.data(), 42);
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use super::Scope;

/// Global sequence counter for context ordering.
static CONTEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Immutable payload of one firing.
///
/// - `K`: event type key
/// - `D`: event-specific data
#[derive(Clone, Debug)]
pub struct EventContext<K, D> {
    seq: u64,
    at: SystemTime,
    scope: Scope,
    event_type: K,
    data: D,
}

impl<K, D> EventContext<K, D> {
    /// Creates a context with the current timestamp and the next sequence number.
    pub fn new(scope: impl Into<Scope>, event_type: K, data: D) -> Self {
        Self {
            seq: CONTEXT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            scope: scope.into(),
            event_type,
            data,
        }
    }

    /// Owner scope; part of the listener lookup key.
    #[inline]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Fired event type.
    #[inline]
    pub fn event_type(&self) -> &K {
        &self.event_type
    }

    /// Event-specific payload.
    #[inline]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Globally unique, monotonically increasing sequence number.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Wall-clock construction time.
    #[inline]
    pub fn at(&self) -> SystemTime {
        self.at
    }
}

impl<K> EventContext<K, ()> {
    /// Creates a context without payload.
    pub fn bare(scope: impl Into<Scope>, event_type: K) -> Self {
        Self::new(scope, event_type, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = EventContext::bare("s", 1_u8);
        let b = EventContext::bare("s", 1_u8);
        assert!(b.seq() > a.seq());
    }

    #[test]
    fn test_accessors() {
        let ctx = EventContext::new(String::from("billing"), "invoice_paid", vec![1, 2, 3]);
        assert_eq!(ctx.scope().as_str(), "billing");
        assert_eq!(*ctx.event_type(), "invoice_paid");
        assert_eq!(ctx.data().len(), 3);
        assert!(ctx.at() <= SystemTime::now());
    }
}

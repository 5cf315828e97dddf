//! # Core listener trait
//!
//! `Listener` is the extension point for reacting to fired events. The same
//! implementation can be registered in SYNC mode (awaited inline by
//! `fire_event`) or ASYNC mode (driven by a pool worker); the mode belongs to
//! the registration, not to the listener.
//!
//! ## Identity
//! - Registration dedup compares listener **instances** (`Arc` pointer).
//! - [`EventProvider::unregister_listener`](crate::EventProvider::unregister_listener)
//!   matches the concrete listener **type**, reported by [`Listener::listener_type`].

use std::any::TypeId;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::EventContext;

/// Shared handle to a listener (`Arc<dyn Listener>`), as stored by the registry.
pub type ListenerRef<K, D> = Arc<dyn Listener<K, D>>;

/// Contract for event listeners.
///
/// Called either on the firing task or on a pool worker. Implementations should
/// avoid blocking the async runtime (prefer async I/O and cooperative waits).
/// Errors and panics are captured by the provider and never reach the caller of
/// `fire_event`.
#[async_trait]
pub trait Listener<K, D>: Send + Sync + 'static {
    /// Handle one fired event.
    ///
    /// # Parameters
    /// - `ctx`: Reference to the immutable context (does not transfer ownership)
    async fn on_event(&self, ctx: &EventContext<K, D>) -> Result<(), ListenerError>;

    /// Human-readable name (for logs and failure reports).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Concrete type of the listener, used for type-based unregistration.
    ///
    /// Implementors have no reason to override this.
    #[doc(hidden)]
    fn listener_type(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

/// True if both handles point at the same listener instance.
#[inline]
pub(crate) fn same_instance<K, D>(a: &ListenerRef<K, D>, b: &ListenerRef<K, D>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

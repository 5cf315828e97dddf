//! # Function-backed listener (`ListenerFn`)
//!
//! [`ListenerFn`] wraps a plain closure `F: Fn(&EventContext<K, D>) -> Result<(), ListenerError>`.
//! Handy for counters, bridges to channels and tests; listeners that need to
//! await should implement [`Listener`] directly.
//!
//! Every closure has its own type, so type-based unregistration cannot name a
//! `ListenerFn`; keep the returned handle and use
//! [`EventProvider::unregister_listener_instance`](crate::EventProvider::unregister_listener_instance).
//!
//! ## Example
//! ```rust
//! use eventvisor::{ListenerFn, ListenerRef, EventContext};
//!
//! let l: ListenerRef<&'static str, ()> = ListenerFn::arc("noop", |_ctx: &EventContext<&'static str, ()>| Ok(()));
//! assert_eq!(l.name(), "noop");
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ListenerError;
use crate::events::EventContext;
use crate::listeners::Listener;

/// Closure-backed listener.
pub struct ListenerFn<K, D, F> {
    name: &'static str,
    f: F,
    _marker: PhantomData<fn(&EventContext<K, D>)>,
}

impl<K, D, F> ListenerFn<K, D, F>
where
    F: Fn(&EventContext<K, D>) -> Result<(), ListenerError>,
{
    /// Creates a new function-backed listener.
    ///
    /// Prefer [`ListenerFn::arc`] when you immediately need a handle.
    pub fn new(name: &'static str, f: F) -> Self {
        Self {
            name,
            f,
            _marker: PhantomData,
        }
    }

    /// Creates the listener and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<K, D, F> std::fmt::Debug for ListenerFn<K, D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerFn").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<K, D, F> Listener<K, D> for ListenerFn<K, D, F>
where
    K: Send + Sync + 'static,
    D: Send + Sync + 'static,
    F: Fn(&EventContext<K, D>) -> Result<(), ListenerError> + Send + Sync + 'static,
{
    async fn on_event(&self, ctx: &EventContext<K, D>) -> Result<(), ListenerError> {
        (self.f)(ctx)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

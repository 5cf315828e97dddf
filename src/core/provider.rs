//! # EventProvider: per-scope event registry and dispatcher.
//!
//! The [`EventProvider`] owns the listener registry of every scope, the bounded
//! worker pool used for ASYNC listeners and the [`FailureReporter`] that
//! receives captured listener failures.
//!
//! ## Lifecycle
//! ```text
//!   new() ──► UNINITIALIZED ──init(cfg)──► READY ──destroy()──► DESTROYED (terminal)
//!                  │                         │                      │
//!                  └─ ops: NotInitialized     └─ ops allowed         └─ ops: Destroyed
//! ```
//!
//! ## Dispatch
//! ```text
//! fire_event(ctx)
//!   ├─► registry[ctx.scope][ctx.event_type] ── snapshot under the scope lock
//!   │       (unknown scope/type → Ok, no-op)
//!   ├─► SYNC  entries, registration order: invoke(&ctx).await
//!   │       └─ Err / panic → FailureReporter::report, continue
//!   └─► ASYNC entries, registration order: pool.submit(job)
//!           ├─ Block  policy: wait for a free slot
//!           └─ Reject policy: collect name → Err(DispatchQueueFull) after all submissions
//! ```
//!
//! ## Rules
//! - SYNC listeners of one fire observe the same `EventContext` instance.
//! - No registry lock is held while listeners run, so listeners may register,
//!   unregister, fire or destroy. A listener added during a fire only sees
//!   later fires.
//! - There is no per-fire timeout: a hanging SYNC listener blocks its
//!   `fire_event` call, a hanging ASYNC listener holds a worker until destroy
//!   abandons it.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use eventvisor::{EventConfig, EventContext, EventProvider, ListenerFn};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum OrderEvent { Created }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), eventvisor::EventError> {
//!     let provider: EventProvider<OrderEvent, u64> = EventProvider::new();
//!     provider.init(EventConfig::default()).await?;
//!
//!     let seen = Arc::new(AtomicUsize::new(0));
//!     let counter = Arc::clone(&seen);
//!     provider.register_event("orders", OrderEvent::Created).await?;
//!     provider
//!         .register_listener(
//!             "orders",
//!             OrderEvent::Created,
//!             ListenerFn::arc("counter", move |_ctx: &EventContext<OrderEvent, u64>| {
//!                 counter.fetch_add(1, Ordering::SeqCst);
//!                 Ok(())
//!             }),
//!         )
//!         .await?;
//!
//!     provider.fire_event(EventContext::new("orders", OrderEvent::Created, 1001)).await?;
//!     assert_eq!(seen.load(Ordering::SeqCst), 1);
//!
//!     provider.destroy().await
//! }
//! ```

use std::any::TypeId;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

use super::pool::{Job, SubmitError, WorkerPool};
use super::registry::{AddError, Registry};
use crate::config::EventConfig;
use crate::error::EventError;
use crate::events::{DispatchMode, EventContext, Scope};
use crate::listeners::{FailureReporter, Listener, ListenerRef, LogReporter, invoke};

/// Resources that exist only while the provider is READY.
struct Runtime<K, D> {
    cfg: EventConfig,
    registry: Registry<K, D>,
    pool: WorkerPool,
}

enum Lifecycle<K, D> {
    Uninitialized,
    Ready(Arc<Runtime<K, D>>),
    Destroyed,
}

/// Per-scope event registry and dispatcher.
///
/// - `K`: event type key (usually a fieldless enum)
/// - `D`: payload carried by [`EventContext`]
///
/// All operations are `async` and take `&self`; share the provider behind an
/// `Arc` when listeners or other tasks need to call back into it.
pub struct EventProvider<K, D> {
    state: RwLock<Lifecycle<K, D>>,
    reporter: Arc<dyn FailureReporter>,
}

impl<K, D> Default for EventProvider<K, D>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, D> EventProvider<K, D>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    D: Send + Sync + 'static,
{
    /// Creates an uninitialized provider reporting failures through [`LogReporter`].
    pub fn new() -> Self {
        Self::with_reporter(Arc::new(LogReporter::new()))
    }

    /// Creates an uninitialized provider with a custom failure reporter.
    pub fn with_reporter(reporter: Arc<dyn FailureReporter>) -> Self {
        Self {
            state: RwLock::new(Lifecycle::Uninitialized),
            reporter,
        }
    }

    /// Configures the provider and starts the async worker pool.
    ///
    /// Must be called once, from within a tokio runtime.
    pub async fn init(&self, cfg: EventConfig) -> Result<(), EventError> {
        let mut state = self.state.write().await;
        match &*state {
            Lifecycle::Uninitialized => {}
            Lifecycle::Ready(_) => return Err(EventError::AlreadyInitialized),
            Lifecycle::Destroyed => return Err(EventError::Destroyed),
        }

        info!(
            default_mode = %cfg.default_mode,
            pool = cfg.pool_size_clamped(),
            queue = cfg.queue_capacity_clamped(),
            saturation = cfg.saturation.as_str(),
            grace = ?cfg.destroy_grace,
            reporter = self.reporter.name(),
            "event provider initialized"
        );
        let pool = WorkerPool::new(&cfg);
        *state = Lifecycle::Ready(Arc::new(Runtime {
            cfg,
            registry: Registry::new(),
            pool,
        }));
        Ok(())
    }

    /// Returns the configuration the provider was initialized with.
    pub async fn config(&self) -> Result<EventConfig, EventError> {
        Ok(self.runtime().await?.cfg.clone())
    }

    /// True between a successful `init` and `destroy`.
    pub async fn is_ready(&self) -> bool {
        matches!(&*self.state.read().await, Lifecycle::Ready(_))
    }

    /// True once `destroy` has run.
    pub async fn is_destroyed(&self) -> bool {
        matches!(&*self.state.read().await, Lifecycle::Destroyed)
    }

    /// Tears the provider down.
    ///
    /// Drops every registry, discards queued ASYNC jobs and waits up to
    /// [`EventConfig::destroy_grace`] for running ones; listeners still running
    /// afterwards are logged and abandoned. Can be called from inside a
    /// listener.
    pub async fn destroy(&self) -> Result<(), EventError> {
        let rt = {
            let mut state = self.state.write().await;
            match std::mem::replace(&mut *state, Lifecycle::Destroyed) {
                Lifecycle::Ready(rt) => rt,
                Lifecycle::Uninitialized => {
                    *state = Lifecycle::Uninitialized;
                    return Err(EventError::NotInitialized);
                }
                Lifecycle::Destroyed => return Err(EventError::Destroyed),
            }
        };

        rt.registry.clear().await;
        let report = rt.pool.shutdown(rt.cfg.destroy_grace).await;
        info!(
            discarded = report.discarded,
            abandoned = report.stuck.len(),
            "event provider destroyed"
        );
        Ok(())
    }

    /// Declares `event_type` as fireable in `scope`. Idempotent.
    pub async fn register_event(
        &self,
        scope: impl Into<Scope>,
        event_type: K,
    ) -> Result<(), EventError> {
        let rt = self.runtime().await?;
        let scope = scope.into();
        if rt
            .registry
            .register_event(&scope, event_type.clone())
            .await
        {
            debug!(%scope, ?event_type, "event type registered");
        }
        Ok(())
    }

    /// Removes `event_type` and all its listeners from `scope`.
    ///
    /// Returns `false` if the type was not registered. Dispatches that already
    /// took their snapshot run to completion.
    pub async fn unregister_event(
        &self,
        scope: impl Into<Scope>,
        event_type: &K,
    ) -> Result<bool, EventError> {
        let rt = self.runtime().await?;
        let scope = scope.into();
        let removed = match rt.registry.get(&scope).await {
            Some(reg) => reg.unregister_event(event_type).await,
            None => false,
        };
        if removed {
            debug!(%scope, ?event_type, "event type unregistered");
        }
        Ok(removed)
    }

    /// Registers `listener` for `event_type` with the configured default mode.
    pub async fn register_listener(
        &self,
        scope: impl Into<Scope>,
        event_type: K,
        listener: ListenerRef<K, D>,
    ) -> Result<(), EventError> {
        let mode = self.runtime().await?.cfg.default_mode;
        self.register_listener_with_mode(scope, event_type, listener, mode)
            .await
    }

    /// Registers `listener` for `event_type` with an explicit dispatch mode.
    ///
    /// # Errors
    /// - [`EventError::UnknownEventType`] if the type was never registered in `scope`
    /// - [`EventError::DuplicateListener`] if this instance is already registered
    ///   for the type (the existing registration is left untouched)
    pub async fn register_listener_with_mode(
        &self,
        scope: impl Into<Scope>,
        event_type: K,
        listener: ListenerRef<K, D>,
        mode: DispatchMode,
    ) -> Result<(), EventError> {
        let rt = self.runtime().await?;
        let scope = scope.into();
        let name = listener.name();

        match rt
            .registry
            .add_listener(&scope, &event_type, listener, mode)
            .await
        {
            Ok(()) => {
                debug!(%scope, ?event_type, listener = name, %mode, "listener registered");
                Ok(())
            }
            Err(AddError::UnknownEventType) => Err(unknown_type(scope, &event_type)),
            Err(AddError::Duplicate) => Err(EventError::DuplicateListener {
                scope,
                event_type: format!("{event_type:?}"),
                listener: name,
            }),
        }
    }

    /// Removes every listener of concrete type `L` registered for `event_type`.
    ///
    /// Returns whether anything was removed.
    pub async fn unregister_listener<L>(
        &self,
        scope: impl Into<Scope>,
        event_type: &K,
    ) -> Result<bool, EventError>
    where
        L: Listener<K, D>,
    {
        let rt = self.runtime().await?;
        let scope = scope.into();
        let removed = match rt.registry.get(&scope).await {
            Some(reg) => reg.remove_by_type(event_type, TypeId::of::<L>()).await,
            None => false,
        };
        if removed {
            debug!(%scope, ?event_type, listener = std::any::type_name::<L>(), "listeners unregistered");
        }
        Ok(removed)
    }

    /// Removes exactly this listener instance from `event_type`.
    ///
    /// Returns whether it was registered.
    pub async fn unregister_listener_instance(
        &self,
        scope: impl Into<Scope>,
        event_type: &K,
        listener: &ListenerRef<K, D>,
    ) -> Result<bool, EventError> {
        let rt = self.runtime().await?;
        let scope = scope.into();
        let removed = match rt.registry.get(&scope).await {
            Some(reg) => reg.remove_instance(event_type, listener).await,
            None => false,
        };
        if removed {
            debug!(%scope, ?event_type, listener = listener.name(), "listener unregistered");
        }
        Ok(removed)
    }

    /// Drops `scope` with all its event types and listeners.
    pub async fn remove_scope(&self, scope: impl Into<Scope>) -> Result<bool, EventError> {
        let rt = self.runtime().await?;
        let scope = scope.into();
        let removed = rt.registry.remove(&scope).await;
        if removed {
            debug!(%scope, "scope removed");
        }
        Ok(removed)
    }

    /// Sorted list of scopes with at least one registration.
    pub async fn scopes(&self) -> Result<Vec<Scope>, EventError> {
        Ok(self.runtime().await?.registry.scopes().await)
    }

    /// Event types declared in `scope` (unordered; empty for an unknown scope).
    pub async fn event_types(&self, scope: impl Into<Scope>) -> Result<Vec<K>, EventError> {
        let rt = self.runtime().await?;
        Ok(match rt.registry.get(&scope.into()).await {
            Some(reg) => reg.event_types().await,
            None => Vec::new(),
        })
    }

    /// Number of listeners registered for `event_type`; `None` if the type is unknown.
    pub async fn listener_count(
        &self,
        scope: impl Into<Scope>,
        event_type: &K,
    ) -> Result<Option<usize>, EventError> {
        let rt = self.runtime().await?;
        Ok(match rt.registry.get(&scope.into()).await {
            Some(reg) => reg.listener_count(event_type).await,
            None => None,
        })
    }

    /// Delivers `ctx` to the listeners of its scope and event type.
    ///
    /// SYNC listeners run first, in registration order, and have all finished
    /// when this returns. ASYNC listeners are then submitted in registration
    /// order and run on the pool. Listener failures never fail this call.
    ///
    /// # Errors
    /// - lifecycle errors ([`EventError::NotInitialized`], [`EventError::Destroyed`])
    /// - [`EventError::DispatchQueueFull`] under [`SaturationPolicy::Reject`](crate::SaturationPolicy::Reject)
    pub async fn fire_event(&self, ctx: EventContext<K, D>) -> Result<(), EventError> {
        let rt = self.runtime().await?;

        let Some(reg) = rt.registry.get(ctx.scope()).await else {
            trace!(scope = %ctx.scope(), event_type = ?ctx.event_type(), "no such scope; nothing to fire");
            return Ok(());
        };
        let Some(entries) = reg.snapshot(ctx.event_type()).await else {
            trace!(scope = %ctx.scope(), event_type = ?ctx.event_type(), "no such event type; nothing to fire");
            return Ok(());
        };
        drop(reg);

        let ctx = Arc::new(ctx);
        let (sync, deferred): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|e| e.mode == DispatchMode::Sync);

        trace!(
            scope = %ctx.scope(),
            event_type = ?ctx.event_type(),
            seq = ctx.seq(),
            sync = sync.len(),
            deferred = deferred.len(),
            "firing event"
        );

        for entry in &sync {
            invoke(&entry.listener, DispatchMode::Sync, &*ctx, &*self.reporter).await;
        }

        let mut rejected = Vec::new();
        for entry in deferred {
            let name = entry.listener.name();
            let ctx = Arc::clone(&ctx);
            let reporter = Arc::clone(&self.reporter);
            let job = Job {
                listener: name,
                run: async move {
                    invoke(&entry.listener, DispatchMode::Async, &*ctx, &*reporter).await;
                }
                .boxed(),
            };
            match rt.pool.submit(job).await {
                Ok(()) => {}
                Err(SubmitError::Full) => rejected.push(name),
                Err(SubmitError::Closed) => return Err(EventError::Destroyed),
            }
        }

        if rejected.is_empty() {
            Ok(())
        } else {
            warn!(
                scope = %ctx.scope(),
                event_type = ?ctx.event_type(),
                ?rejected,
                "async dispatch queue full"
            );
            Err(EventError::DispatchQueueFull {
                capacity: rt.pool.capacity(),
                rejected,
            })
        }
    }

    async fn runtime(&self) -> Result<Arc<Runtime<K, D>>, EventError> {
        match &*self.state.read().await {
            Lifecycle::Uninitialized => Err(EventError::NotInitialized),
            Lifecycle::Ready(rt) => Ok(Arc::clone(rt)),
            Lifecycle::Destroyed => Err(EventError::Destroyed),
        }
    }
}

fn unknown_type<K: Debug>(scope: Scope, event_type: &K) -> EventError {
    EventError::UnknownEventType {
        scope,
        event_type: format!("{event_type:?}"),
    }
}

//! # eventvisor
//!
//! **Eventvisor** is an in-process event registry and dispatcher for modular
//! applications built on tokio.
//!
//! Module code declares event types inside an owner [`Scope`], registers
//! [`Listener`]s for them and fires [`EventContext`]s. Each registration carries
//! a [`DispatchMode`]: SYNC listeners are awaited inline by the firing task, in
//! registration order; ASYNC listeners are handed to a bounded worker pool.
//! A failing or panicking listener never stops delivery to the others; its
//! failure goes to a [`FailureReporter`] instead of the caller.
//!
//! ## Architecture
//! ```text
//!   module code
//!       │ register_event / register_listener / fire_event
//!       ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  EventProvider  (UNINITIALIZED → READY → DESTROYED)               │
//! │                                                                   │
//! │  Registry                                                         │
//! │   ├─ scope "orders"  ─► { Created  → [A(sync), B(sync), M(async)]│
//! │   │                      Cancelled → [...] }                      │
//! │   └─ scope "billing" ─► { ... }              (per-scope RwLock)   │
//! └──────┬─────────────────────────────────────────────┬──────────────┘
//!        │ snapshot, then no lock held                 │
//!        ▼                                             ▼
//!   SYNC: A.on_event → B.on_event            ASYNC: [bounded queue]
//!   (firing task, in order, awaited)                 ├─► worker 0 ─► M.on_event
//!                                                    └─► worker N
//!        │ Err / panic                               │ Err / panic
//!        └──────────────► FailureReporter ◄──────────┘
//!                         (LogReporter → tracing)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                         |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------|
//! | **Dispatch**      | Register event types and listeners, fire contexts.           | [`EventProvider`], [`EventContext`]        |
//! | **Listeners**     | Async trait or plain closures, SYNC or ASYNC per registration.| [`Listener`], [`ListenerFn`], [`DispatchMode`] |
//! | **Failures**      | Captured per listener, reported out of band.                 | [`FailureReporter`], [`LogReporter`]       |
//! | **Errors**        | Typed errors for callers and reporters.                      | [`EventError`], [`ListenerInvocationError`] |
//! | **Configuration** | Pool size, queue, saturation policy, destroy grace.          | [`EventConfig`], [`ModuleConfigurable`]    |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use eventvisor::{
//!     DispatchMode, EventConfig, EventContext, EventProvider, Listener, ListenerError,
//! };
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum OrderEvent { Created, Cancelled }
//!
//! struct Mailer;
//!
//! #[async_trait]
//! impl Listener<OrderEvent, String> for Mailer {
//!     async fn on_event(&self, ctx: &EventContext<OrderEvent, String>) -> Result<(), ListenerError> {
//!         if ctx.data().is_empty() {
//!             return Err(ListenerError::fail("no recipient"));
//!         }
//!         // send mail...
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "mailer" }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider: EventProvider<OrderEvent, String> = EventProvider::new();
//!     provider.init(EventConfig::default()).await?;
//!
//!     provider.register_event("orders", OrderEvent::Created).await?;
//!     provider
//!         .register_listener_with_mode("orders", OrderEvent::Created, Arc::new(Mailer), DispatchMode::Async)
//!         .await?;
//!
//!     provider
//!         .fire_event(EventContext::new("orders", OrderEvent::Created, "ops@example.com".to_string()))
//!         .await?;
//!
//!     provider.destroy().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod listeners;
mod module;

// ---- Public re-exports ----

pub use config::{EventConfig, SaturationPolicy};
pub use core::EventProvider;
pub use error::{ConfigError, EventError, InvocationFailure, ListenerError, ListenerInvocationError};
pub use events::{DispatchMode, EventContext, Scope};
pub use listeners::{FailureReporter, Listener, ListenerFn, ListenerRef, LogReporter};
pub use module::ModuleConfigurable;

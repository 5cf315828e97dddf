//! # Listeners and failure reporting.
//!
//! This module provides the [`Listener`] trait, a closure-backed implementation
//! ([`ListenerFn`]) and the [`FailureReporter`] collaborator that receives
//! captured listener failures.
//!
//! ## Architecture
//! ```text
//! fire_event(ctx)
//!     │
//!     ├──► SYNC  entries ──► invoke() ──► Listener::on_event(&ctx)   (in order, awaited)
//!     │                         └──────► Err / panic → FailureReporter::report()
//!     │
//!     └──► ASYNC entries ──► pool queue ──► worker ──► invoke() ──► ...
//! ```
//!
//! ## Implementing a listener
//! ```no_run
//! use async_trait::async_trait;
//! use eventvisor::{EventContext, Listener, ListenerError};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum OrderEvent { Created, Cancelled }
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Listener<OrderEvent, u64> for Audit {
//!     async fn on_event(&self, ctx: &EventContext<OrderEvent, u64>) -> Result<(), ListenerError> {
//!         match ctx.event_type() {
//!             OrderEvent::Created => { /* write audit record */ }
//!             OrderEvent::Cancelled => {}
//!         }
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

mod invoke;
mod listener;
mod listener_fn;
mod log;
mod reporter;

pub(crate) use invoke::invoke;
pub(crate) use listener::same_instance;
pub use listener::{Listener, ListenerRef};
pub use listener_fn::ListenerFn;
pub use log::LogReporter;
pub use reporter::FailureReporter;

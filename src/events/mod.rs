//! Event data model: scopes, dispatch modes and fired contexts.
//!
//! ## Contents
//! - [`Scope`] owner namespace of event types and listeners
//! - [`DispatchMode`] per-listener delivery mode (SYNC / ASYNC)
//! - [`EventContext`] immutable payload of one firing
//!
//! ## Quick reference
//! - **Producers**: module code builds an [`EventContext`] and passes it to
//!   [`EventProvider::fire_event`](crate::EventProvider::fire_event).
//! - **Consumers**: [`Listener`](crate::Listener) implementations, which only
//!   ever see the context by shared reference.

mod context;
mod mode;
mod scope;

pub use context::EventContext;
pub use mode::DispatchMode;
pub use scope::Scope;

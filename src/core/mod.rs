//! Runtime core: registry, dispatch and the async worker pool.
//!
//! The only public API from this module is [`EventProvider`], which owns the
//! per-scope registries, dispatches fired contexts and manages its own
//! lifecycle.
//!
//! Internal modules:
//! - [`provider`]: lifecycle state machine, registration API and `fire_event`;
//! - [`registry`]: scope → event type → ordered listener entries;
//! - [`pool`]: bounded queue plus worker tasks for ASYNC listeners;
//! - [`inflight`]: which listener each worker is running (for destroy reports).

mod inflight;
mod pool;
mod provider;
mod registry;

pub use provider::EventProvider;

//! # Failure reporting collaborator.
//!
//! Every listener failure captured by the provider (returned error or panic,
//! SYNC or ASYNC) is handed to one [`FailureReporter`]. Reporting is
//! fire-and-forget: the provider ignores what the reporter does with it and
//! continues delivering to the remaining listeners.

use crate::error::ListenerInvocationError;

/// Receives captured listener failures.
///
/// Called inline from the firing task (SYNC) or from a pool worker (ASYNC), so
/// implementations must be quick and must not block.
pub trait FailureReporter: Send + Sync + 'static {
    /// Record one failure.
    fn report(&self, failure: &ListenerInvocationError);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

//! # LogReporter: default failure reporter
//!
//! Writes captured listener failures through `tracing`. Returned errors are
//! logged at `warn`, panics at `error`.
//!
//! ## Example output
//! ```text
//! WARN eventvisor: listener failed listener="audit" scope=orders event_type=Created mode=sync seq=12 error=listener failed: db down
//! ERROR eventvisor: listener panicked listener="mailer" scope=orders event_type=Created mode=async seq=12 info=boom
//! ```

use tracing::{error, warn};

use crate::error::{InvocationFailure, ListenerInvocationError};
use crate::listeners::FailureReporter;

/// Failure reporter backed by `tracing`.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogReporter;

impl LogReporter {
    /// Construct a new [`LogReporter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FailureReporter for LogReporter {
    fn report(&self, f: &ListenerInvocationError) {
        match &f.cause {
            InvocationFailure::Returned(err) => {
                warn!(
                    target: "eventvisor",
                    listener = f.listener,
                    scope = %f.scope,
                    event_type = %f.event_type,
                    mode = %f.mode,
                    seq = f.seq,
                    label = err.as_label(),
                    error = %err,
                    "listener failed"
                );
            }
            InvocationFailure::Panicked(info) => {
                error!(
                    target: "eventvisor",
                    listener = f.listener,
                    scope = %f.scope,
                    event_type = %f.event_type,
                    mode = %f.mode,
                    seq = f.seq,
                    info = %info,
                    "listener panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogReporter"
    }
}

//! Single listener invocation with failure capture.
//!
//! Shared by the SYNC path (firing task) and the ASYNC path (pool workers).
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave shared state
//! inconsistent if a listener uses `Arc<Mutex<T>>` and panics while holding the lock.

use std::fmt::Debug;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::error::{InvocationFailure, ListenerInvocationError};
use crate::events::{DispatchMode, EventContext};
use crate::listeners::{FailureReporter, ListenerRef};

/// Runs one listener against one context; failures go to `reporter`.
///
/// Returns `true` if the listener completed successfully.
pub(crate) async fn invoke<K, D>(
    listener: &ListenerRef<K, D>,
    mode: DispatchMode,
    ctx: &EventContext<K, D>,
    reporter: &dyn FailureReporter,
) -> bool
where
    K: Debug + 'static,
    D: 'static,
{
    let outcome = AssertUnwindSafe(listener.on_event(ctx)).catch_unwind().await;

    let cause = match outcome {
        Ok(Ok(())) => return true,
        Ok(Err(err)) => InvocationFailure::Returned(err),
        Err(panic_err) => {
            let any = &*panic_err;
            let info = if let Some(msg) = any.downcast_ref::<&'static str>() {
                (*msg).to_string()
            } else if let Some(msg) = any.downcast_ref::<String>() {
                msg.clone()
            } else {
                "unknown panic".to_string()
            };
            InvocationFailure::Panicked(info)
        }
    };

    reporter.report(&ListenerInvocationError {
        listener: listener.name(),
        scope: ctx.scope().clone(),
        event_type: format!("{:?}", ctx.event_type()),
        mode,
        seq: ctx.seq(),
        cause,
    });
    false
}

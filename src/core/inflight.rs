//! # In-flight tracker for pool workers.
//!
//! Records which listener each pool worker is currently running, so that a
//! destroy that runs out of grace can name the listeners it abandons.
//!
//! ## Architecture
//! ```text
//! worker N ──► enter(N, name) ──► job ──► leave(N)
//!                                   │
//! destroy ── grace exceeded ──► snapshot_except(caller) ──► warn!(stuck = [...])
//! ```
//!
//! ## Rules
//! - One slot per worker; a worker runs at most one job at a time
//! - A worker's slot is set before its job is polled and cleared after it
//!   returns, so a snapshot names every listener still running

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Thread-safe map of worker id → listener currently running on it.
pub(crate) struct InFlight {
    running: RwLock<HashMap<usize, &'static str>>,
}

impl InFlight {
    /// Creates a new empty tracker.
    pub(crate) fn new() -> Self {
        Self {
            running: RwLock::new(HashMap::new()),
        }
    }

    /// Marks `worker` as running `listener`.
    pub(crate) async fn enter(&self, worker: usize, listener: &'static str) {
        self.running.write().await.insert(worker, listener);
    }

    /// Marks `worker` as idle.
    pub(crate) async fn leave(&self, worker: usize) {
        self.running.write().await.remove(&worker);
    }

    /// Returns sorted names of running listeners, skipping `worker` if given.
    pub(crate) async fn snapshot_except(&self, worker: Option<usize>) -> Vec<&'static str> {
        let running = self.running.read().await;
        let mut names: Vec<&'static str> = running
            .iter()
            .filter(|(id, _)| Some(**id) != worker)
            .map(|(_, name)| *name)
            .collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enter_leave_snapshot() {
        let t = InFlight::new();
        t.enter(0, "mailer").await;
        t.enter(1, "audit").await;
        assert_eq!(t.snapshot_except(None).await, vec!["audit", "mailer"]);
        assert_eq!(t.snapshot_except(Some(1)).await, vec!["mailer"]);

        t.leave(0).await;
        assert_eq!(t.snapshot_except(None).await, vec!["audit"]);
    }
}

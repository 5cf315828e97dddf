//! # Async Listeners Example
//!
//! Mixes SYNC and ASYNC listeners and shows the worker pool at work.
//!
//! Shows:
//! - SYNC listeners finish before `fire_event` returns
//! - ASYNC listeners run on the pool and may complete out of order
//! - `Reject` saturation policy surfacing `DispatchQueueFull`
//! - destroy discarding queued jobs and abandoning a stuck listener
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=debug cargo run --example async_listeners
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventvisor::{
    DispatchMode, EventConfig, EventContext, EventError, EventProvider, Listener, ListenerError,
    ListenerFn, ModuleConfigurable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Job {
    Uploaded,
}

type Ctx = EventContext<Job, Duration>;

/// Simulates slow work; the payload says how long.
struct Thumbnailer;

#[async_trait]
impl Listener<Job, Duration> for Thumbnailer {
    async fn on_event(&self, ctx: &Ctx) -> Result<(), ListenerError> {
        tokio::time::sleep(*ctx.data()).await;
        println!(" ├─► thumbnail done   (seq {}, took {:?})", ctx.seq(), ctx.data());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "thumbnailer"
    }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // the module system hands configuration over as a string map
    let mut settings = HashMap::new();
    settings.insert("async_pool_size".to_string(), "2".to_string());
    settings.insert("queue_capacity".to_string(), "2".to_string());
    settings.insert("saturation_policy".to_string(), "reject".to_string());
    settings.insert("destroy_grace_millis".to_string(), "300".to_string());
    let cfg = EventConfig::from_map(&settings)?;
    println!("Config ({}): {:?}", cfg.module_name(), cfg.to_map());

    let provider: EventProvider<Job, Duration> = EventProvider::new();
    provider.init(cfg).await?;
    provider.register_event("media", Job::Uploaded).await?;

    provider
        .register_listener_with_mode("media", Job::Uploaded, Arc::new(Thumbnailer), DispatchMode::Async)
        .await?;
    provider
        .register_listener(
            "media",
            Job::Uploaded,
            ListenerFn::arc("indexer", |ctx: &Ctx| {
                println!(" ├─► indexed inline   (seq {})", ctx.seq());
                Ok(())
            }),
        )
        .await?;

    println!("Firing:");
    for ms in [400, 50, 10, 10, 10] {
        match provider
            .fire_event(EventContext::new("media", Job::Uploaded, Duration::from_millis(ms)))
            .await
        {
            Ok(()) => {}
            Err(EventError::DispatchQueueFull { rejected, .. }) => {
                println!(" ├─► queue full, rejected: {rejected:?}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    println!(" └─► destroying");
    provider.destroy().await?;
    Ok(())
}

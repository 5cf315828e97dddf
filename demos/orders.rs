//! # Orders Example
//!
//! Two SYNC listeners on one event type, a failing listener in between and a
//! listener that is removed again.
//!
//! Shows:
//! - registration order == delivery order
//! - a failing listener does not stop delivery
//! - type-based and instance-based unregistration
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=debug cargo run --example orders
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use eventvisor::{
    EventConfig, EventContext, EventProvider, Listener, ListenerError, ListenerFn, ListenerRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum OrderEvent {
    Created,
    Cancelled,
}

#[derive(Debug)]
struct Order {
    id: u64,
    total_cents: u64,
}

type Ctx = EventContext<OrderEvent, Order>;

struct Revenue {
    cents: AtomicU64,
}

#[async_trait]
impl Listener<OrderEvent, Order> for Revenue {
    async fn on_event(&self, ctx: &Ctx) -> Result<(), ListenerError> {
        match ctx.event_type() {
            OrderEvent::Created => {
                self.cents.fetch_add(ctx.data().total_cents, Ordering::Relaxed);
            }
            OrderEvent::Cancelled => {
                self.cents.fetch_sub(ctx.data().total_cents, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "revenue"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let provider: EventProvider<OrderEvent, Order> = EventProvider::new();
    provider.init(EventConfig::default()).await?;

    provider.register_event("orders", OrderEvent::Created).await?;
    provider.register_event("orders", OrderEvent::Cancelled).await?;

    let revenue = Arc::new(Revenue {
        cents: AtomicU64::new(0),
    });
    let printer: ListenerRef<OrderEvent, Order> = ListenerFn::arc("printer", |ctx: &Ctx| {
        println!(" ├─► {:?} order #{} (seq {})", ctx.event_type(), ctx.data().id, ctx.seq());
        Ok(())
    });
    let picky: ListenerRef<OrderEvent, Order> = ListenerFn::arc("picky", |ctx: &Ctx| {
        if ctx.data().total_cents == 0 {
            return Err(ListenerError::fail("free orders are suspicious"));
        }
        Ok(())
    });

    for kind in [OrderEvent::Created, OrderEvent::Cancelled] {
        provider.register_listener("orders", kind, revenue.clone()).await?;
        provider.register_listener("orders", kind, Arc::clone(&printer)).await?;
    }
    provider
        .register_listener("orders", OrderEvent::Created, Arc::clone(&picky))
        .await?;

    println!("Firing:");
    for (id, total_cents) in [(1, 2_500), (2, 0), (3, 990)] {
        provider
            .fire_event(EventContext::new(
                "orders",
                OrderEvent::Created,
                Order { id, total_cents },
            ))
            .await?;
    }
    provider
        .fire_event(EventContext::new(
            "orders",
            OrderEvent::Cancelled,
            Order {
                id: 1,
                total_cents: 2_500,
            },
        ))
        .await?;
    println!(" └─► revenue: {} cents", revenue.cents.load(Ordering::Relaxed));

    provider
        .unregister_listener_instance("orders", &OrderEvent::Created, &picky)
        .await?;
    provider
        .unregister_listener::<Revenue>("orders", &OrderEvent::Created)
        .await?;
    println!(
        "Listeners left on Created: {:?}",
        provider.listener_count("orders", &OrderEvent::Created).await?
    );

    provider.destroy().await?;
    Ok(())
}

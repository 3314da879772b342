//! Server-Sent Events for the kitchen order feed

use crate::db::OrderRecord;
use crate::runtime::OrderEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Send the current order list, then every change as it happens
pub fn sse_stream(
    orders: Vec<OrderRecord>,
    broadcast_rx: tokio::sync::broadcast::Receiver<OrderEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move {
        let data = json!({ "type": "init", "orders": orders });
        Ok(Event::default().event("init").data(data.to_string()))
    });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(order_event_to_axum(&event))),
        Err(e) => {
            // Kitchen clients resync from /api/orders on their next poll
            tracing::warn!(error = %e, "Order feed subscriber lagged");
            None
        }
    });

    Sse::new(init.chain(broadcasts)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn order_event_to_axum(event: &OrderEvent) -> Event {
    let name = match event {
        OrderEvent::OrderCreated { .. } => "order_created",
        OrderEvent::OrderUpdated { .. } => "order_updated",
    };
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(name).data(data)
}

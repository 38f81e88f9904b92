//! Server-Sent Events support

use crate::runtime::{ClientSnapshot, ClientUpdate};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Stream the snapshot as `init`, then every runtime update
pub fn sse_stream(
    init: ClientSnapshot,
    updates: broadcast::Receiver<ClientUpdate>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let init = futures::stream::once(async move { Ok(init_event(&init)) });

    let updates = BroadcastStream::new(updates).filter_map(|result| match result {
        Ok(update) => Some(Ok(update_event(&update))),
        Err(e) => {
            // Lagged receivers pick up again from the next update
            tracing::warn!(error = %e, "SSE subscriber fell behind");
            None
        }
    });

    Sse::new(init.chain(updates)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn init_event(snapshot: &ClientSnapshot) -> Event {
    let data = json!({
        "type": "init",
        "principal": snapshot.principal,
        "chat": snapshot.chat,
        "listings": snapshot.listings,
    });
    Event::default().event("init").data(data.to_string())
}

/// SSE event name for an update; matches its `type` tag
fn event_name(update: &ClientUpdate) -> &'static str {
    match update {
        ClientUpdate::Transcript { .. } => "transcript",
        ClientUpdate::Listings { .. } => "listings",
        ClientUpdate::Draft { .. } => "draft",
        ClientUpdate::Session { .. } => "session",
        ClientUpdate::Alert { .. } => "alert",
        ClientUpdate::ListingCreated { .. } => "listing_created",
    }
}

fn update_event(update: &ClientUpdate) -> Event {
    let data = serde_json::to_string(update).unwrap_or_else(|e| {
        json!({ "type": "error", "message": e.to_string() }).to_string()
    });
    Event::default().event(event_name(update)).data(data)
}

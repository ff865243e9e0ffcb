//! Server-sent event streams over live list screens.
//!
//! The first event carries the mounted snapshot; each later event carries the
//! collection after a change. A failed push is answered with a re-fetched
//! snapshot. Closing the connection drops the screen, which releases its store
//! subscription.

use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use dossier_core::Record;
use dossier_services::RecordScreen;
use futures::stream::{self, Stream, StreamExt};

fn snapshot_event<T: Record>(items: &[T]) -> Event {
    Event::default()
        .event("snapshot")
        .json_data(items)
        .unwrap_or_else(|e| Event::default().event("error").data(e.to_string()))
}

pub fn screen_events<T: Record>(
    screen: RecordScreen<T>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let initial = snapshot_event(screen.items());
    tracing::debug!(path = %screen.path(), "Live list stream opened");

    let updates = stream::unfold(screen, |mut screen| async move {
        let pushed = screen.next_update().await?.map(snapshot_event);
        let event = match pushed {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %screen.path(),
                    "Live list update failed, re-fetching"
                );
                match screen.reconcile().await {
                    Ok(()) => snapshot_event(screen.items()),
                    Err(e) => Event::default().event("error").data(e.to_string()),
                }
            }
        };
        Some((Ok(event), screen))
    });

    Sse::new(stream::once(async move { Ok::<_, Infallible>(initial) }).chain(updates))
        .keep_alive(KeepAlive::default())
}

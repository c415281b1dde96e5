//! SSE stream of feedback change events for live dashboards.

use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use tokio_stream::{Stream, StreamExt, wrappers::BroadcastStream};

use crate::AppState;

/// GET /api/events/feedback
/// One event per insert or delete; clients re-query the aggregates on each.
pub async fn feedback_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|event| {
        // Lagged receivers just skip the missed entries.
        let event = event.ok()?;
        Event::default()
            .event("feedback")
            .json_data(&event)
            .ok()
            .map(Ok::<_, Infallible>)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/events",
        Router::new().route("/feedback", get(feedback_events)),
    )
}

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use brand_cms_core::events::ContentEvent;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/listen", get(listen))
}

fn to_sse(event: &ContentEvent) -> Event {
    let data = serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(event.name()).data(data)
}

/// Change feed. Opens with `welcome`; a listener that lags behind the bus
/// gets `reconnect` in place of the events it missed.
async fn listen(State(state): State<AppState>) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.event_bus().subscribe();
    tracing::debug!(subscribers = state.event_bus().subscriber_count(), "listener connected");

    let changes = BroadcastStream::new(rx).map(|item| match item {
        Ok(event) => Ok(to_sse(&event)),
        Err(lagged) => {
            tracing::debug!(error = %lagged, "listener lagged");
            Ok(to_sse(&ContentEvent::Reconnect))
        }
    });
    let stream = tokio_stream::once(Ok::<_, Infallible>(to_sse(&ContentEvent::Welcome))).chain(changes);

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

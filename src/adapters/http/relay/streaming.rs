//! NDJSON response streaming.
//!
//! The relay task writes encoded events into a bounded channel; the response
//! body drains it. Closing the sink drops the sender, which ends the body.

use std::convert::Infallible;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

use crate::domain::relay::RelayEvent;
use crate::ports::EventSink;

/// Buffered events per response before the relay task waits on the client.
pub const EVENT_BUFFER: usize = 32;

/// Event sink that feeds an HTTP response body.
pub struct ChannelEventSink {
    tx: Option<mpsc::Sender<String>>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<String>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Creates a sink together with the streaming response it feeds.
    pub fn with_response() -> (Self, Response) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        (Self::new(tx), ndjson_response(rx))
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&mut self, event: RelayEvent) {
        let Some(tx) = &self.tx else {
            tracing::debug!("Dropping event emitted after close");
            return;
        };

        let line = match event.to_json_line() {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to encode relay event: {}", e);
                return;
            }
        };

        if tx.send(line).await.is_err() {
            tracing::debug!("Client disconnected; event discarded");
        }
    }

    async fn close(&mut self) {
        self.tx.take();
    }
}

/// Builds a `200 OK` response whose body streams the received lines.
pub fn ndjson_response(rx: mpsc::Receiver<String>) -> Response {
    let stream = ReceiverStream::new(rx).map(Ok::<_, Infallible>);
    (
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(stream),
    )
        .into_response()
}

//! The push side of synchronization: a long-lived websocket delivering
//! asynchronous property-change notifications.
//!
//! Frames are envelopes `{messageType, data}`; only `propertyStatus` is
//! consumed. A malformed frame is dropped with a diagnostic and the
//! channel keeps reading. The reader task reconnects with bounded
//! exponential backoff and reports reconnections so the entity can
//! re-pull whatever it missed while the channel was down.

use std::time::Duration;

use compact_str::CompactString;
use futures::{Stream, StreamExt};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value as Json;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::AbortHandle,
};
use tokio_tungstenite::tungstenite::{self, Message};

use crate::{Result, transport::StatusBody};

/// Reconnect delay bounds: doubling from `initial`, capped at `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    pub initial: Duration,
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self { initial: Duration::from_secs(1), max: Duration::from_secs(60) }
    }
}

impl Backoff {
    fn after(&self, current: Duration) -> Duration {
        (current * 2).min(self.max)
    }
}

#[derive(Debug)]
pub enum PushEvent {
    /// Payload of one `propertyStatus` frame.
    Status(StatusBody),
    /// The channel re-established after a drop. Frames may have been
    /// missed; the entity re-pulls on this.
    Reconnected,
}

/// Handle to the reader task of one entity's push channel.
pub struct PushChannel {
    rx: UnboundedReceiver<PushEvent>,
    abort: AbortHandle,
}

impl PushChannel {
    /// Spawn the reader task. Must be called within a tokio runtime.
    pub fn open(endpoint: Url, backoff: Backoff) -> PushChannel {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_channel(endpoint, backoff, tx));

        PushChannel { rx, abort: task.abort_handle() }
    }

    /// `None` once the reader task has gone away for good.
    pub async fn recv(&mut self) -> Option<PushEvent> {
        self.rx.recv().await
    }

    pub(crate) fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }
}

impl Drop for PushChannel {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

async fn run_channel(endpoint: Url, backoff: Backoff, tx: UnboundedSender<PushEvent>) {
    let mut delay = backoff.initial;
    let mut connected_before = false;

    loop {
        match connect(&endpoint).await {
            Ok(mut stream) => {
                tracing::debug!(%endpoint, "push channel open");
                delay = backoff.initial;

                if connected_before && tx.send(PushEvent::Reconnected).is_err() {
                    return;
                }
                connected_before = true;

                while let Some(frame) = stream.next().await {
                    match frame {
                        Ok(Message::Text(text)) => {
                            if let Some(data) = decode_frame(&text) {
                                if tx.send(PushEvent::Status(data)).is_err() {
                                    return;
                                }
                            }
                        }
                        Ok(Message::Ping(_) | Message::Pong(_)) => {}
                        Ok(Message::Close(_)) => break,
                        Ok(other) => {
                            tracing::debug!("ignoring non-text frame: {other:?}");
                        }
                        Err(e) => {
                            tracing::warn!("push channel error: {e}");
                            break;
                        }
                    }
                }

                tracing::warn!(%endpoint, "push channel dropped");
            }
            Err(e) => {
                tracing::warn!(%endpoint, "push channel connect failed: {e}");
            }
        }

        if tx.is_closed() {
            return;
        }

        tokio::time::sleep(delay).await;
        delay = backoff.after(delay);
    }
}

async fn connect(
    endpoint: &Url,
) -> Result<impl Stream<Item = tungstenite::Result<Message>> + Unpin> {
    let (stream, response) = tokio_tungstenite::connect_async(endpoint.as_str()).await?;
    tracing::debug!("websocket response: {response:?}");

    Ok(stream)
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "messageType")]
    message_type: CompactString,
    #[serde(default)]
    data: Json,
}

fn decode_frame(text: &str) -> Option<StatusBody> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!("dropping malformed frame: {e}");
            return None;
        }
    };

    if envelope.message_type != "propertyStatus" {
        tracing::trace!(message_type = %envelope.message_type, "ignoring frame");
        return None;
    }

    match envelope.data {
        Json::Object(data) => Some(data),
        other => {
            tracing::warn!("propertyStatus payload is not an object: {other}");
            None
        }
    }
}

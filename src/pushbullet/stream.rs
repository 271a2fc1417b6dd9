// Pushbullet websocket consumer — the notification side of the relay.
//
// Holds a persistent websocket to the event stream and reconnects with a
// fixed 3 second delay, forever. A tickle with subtype "push" triggers a
// fetch of the single most recent push; matching notes are chunk-encoded
// and emitted as status updates. Fetch and emit failures are logged and
// the message loop keeps going — only transport faults drop the connection.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use futures::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, info, warn};

use super::client::PushbulletClient;
use super::types::StreamFrame;
use crate::dedup::DedupTracker;
use crate::relay::{relay_note, StatusPoster};
use crate::retry::{ConnectionOutcome, RetryPolicy};

/// Base URL for the websocket event stream; the access token is appended
/// as the final path segment.
pub const DEFAULT_STREAM_URL: &str = "wss://stream.pushbullet.com/websocket";

/// The notification-stream consumer.
pub struct TickleStream {
    client: PushbulletClient,
    poster: Arc<dyn StatusPoster>,
    tracker: DedupTracker,
    policy: RetryPolicy,
    stream_url: String,
    /// Epoch-seconds watermark scoping each fetch to "since last check".
    /// Set on connect, refreshed immediately before every fetch query.
    watermark: i64,
}

impl TickleStream {
    pub fn new(
        client: PushbulletClient,
        poster: Arc<dyn StatusPoster>,
        tracker: DedupTracker,
        access_token: &str,
    ) -> Self {
        Self {
            client,
            poster,
            tracker,
            policy: RetryPolicy::pushbullet(),
            stream_url: format!("{DEFAULT_STREAM_URL}/{access_token}"),
            watermark: 0,
        }
    }

    /// Run the reconnect loop for the process lifetime. Never returns
    /// under normal operation.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let outcome = self.run_connection().await;
            self.policy.wait_after(outcome).await;
        }
    }

    /// One connection lifetime: connect, loop over frames, report how it
    /// ended.
    async fn run_connection(&mut self) -> ConnectionOutcome {
        info!("Connecting to Pushbullet event stream");

        let (ws, _) = match connect_async(self.stream_url.as_str()).await {
            Ok(connected) => connected,
            Err(e) => {
                warn!(error = %e, "Websocket connect failed");
                return ConnectionOutcome::Error;
            }
        };
        info!("Websocket connected");
        self.watermark = Utc::now().timestamp();

        let (_write, mut read) = ws.split();
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => self.handle_frame(&text).await,
                Ok(Message::Close(frame)) => {
                    info!(frame = ?frame, "Websocket closed by remote");
                    return ConnectionOutcome::CleanClose;
                }
                // Ping/pong are answered by tungstenite; binary is not
                // part of this protocol.
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Websocket receive error");
                    return ConnectionOutcome::Error;
                }
            }
        }

        info!("Websocket stream ended");
        ConnectionOutcome::CleanClose
    }

    /// Parse one frame; push tickles trigger fetch-and-relay. A failed
    /// fetch is logged and the connection stays up.
    async fn handle_frame(&mut self, text: &str) {
        let frame: StreamFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                debug!(error = %e, "Ignoring unparseable frame");
                return;
            }
        };

        if !frame.is_push_tickle() {
            return;
        }

        debug!("Push tickle received");
        if let Err(e) = self.fetch_and_relay().await {
            warn!(error = %e, "Fetch failed");
        }
    }

    /// Fetch the most recent push since the watermark and relay matching
    /// notes. An emission failure is logged per item; later items in the
    /// batch still attempt emission.
    async fn fetch_and_relay(&mut self) -> Result<()> {
        self.watermark = Utc::now().timestamp();
        let pushes = self.client.recent_pushes(self.watermark).await?;

        for push in pushes {
            if !push.is_relay_note() {
                continue;
            }
            let Some(body) = push.body.as_deref() else {
                continue;
            };
            if let Err(e) = relay_note(self.poster.as_ref(), &self.tracker, body).await {
                warn!(error = %e, "Status emission failed");
            }
        }

        Ok(())
    }
}

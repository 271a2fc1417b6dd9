// Status stream consumer — the status side of the relay.
//
// Subscribes to the user stream and dispatches every inbound status:
// self-echoes are consumed and dropped, decodable payloads are pushed back
// as notes. Supervision is retry-then-repeat: 10 seconds after a
// subscription error, immediate resubscribe after a clean end of stream,
// forever.

use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use tracing::{debug, info, warn};

use super::client::StatusApiClient;
use super::types::StatusUpdate;
use crate::dedup::DedupTracker;
use crate::relay::{handle_status, NotePusher};
use crate::retry::{ConnectionOutcome, RetryPolicy};

/// The status-stream consumer.
pub struct StatusStream {
    api: StatusApiClient,
    pusher: Arc<dyn NotePusher>,
    tracker: DedupTracker,
    policy: RetryPolicy,
}

impl StatusStream {
    pub fn new(api: StatusApiClient, pusher: Arc<dyn NotePusher>, tracker: DedupTracker) -> Self {
        Self {
            api,
            pusher,
            tracker,
            policy: RetryPolicy::status_stream(),
        }
    }

    /// Run the supervisory loop for the process lifetime. Never returns
    /// under normal operation.
    pub async fn run(self) -> Result<()> {
        loop {
            let outcome = self.run_subscription().await;
            self.policy.wait_after(outcome).await;
        }
    }

    /// One subscription lifetime: open the stream, frame it into lines,
    /// dispatch each, report how it ended.
    async fn run_subscription(&self) -> ConnectionOutcome {
        info!("Subscribing to user stream");

        let response = match self.api.open_stream().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Stream subscription failed");
                return ConnectionOutcome::Error;
            }
        };
        info!("User stream connected");

        let mut chunks = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(error = %e, "Stream read error");
                    return ConnectionOutcome::Error;
                }
            };

            buffer.extend_from_slice(&chunk);
            while let Some(line) = next_line(&mut buffer) {
                // Blank lines are keepalives.
                if line.is_empty() {
                    continue;
                }
                self.dispatch_line(&line).await;
            }
        }

        info!("User stream ended");
        ConnectionOutcome::CleanClose
    }

    /// Parse one stream line and hand statuses to the relay handler. The
    /// stream interleaves statuses with other frame kinds; lines that
    /// aren't statuses are ignored. A push failure is logged and does not
    /// affect the subscription.
    async fn dispatch_line(&self, line: &str) {
        let status: StatusUpdate = match serde_json::from_str(line) {
            Ok(status) => status,
            Err(_) => {
                debug!("Ignoring non-status frame");
                return;
            }
        };

        debug!(id = status.id, "Received status");
        if let Err(e) = handle_status(self.pusher.as_ref(), &self.tracker, &status).await {
            warn!(error = %e, id = status.id, "Push failed");
        }
    }
}

/// Drain one newline-terminated line from the buffer, trimmed. `None`
/// when no complete line is buffered yet.
fn next_line(buffer: &mut Vec<u8>) -> Option<String> {
    let pos = buffer.iter().position(|&b| b == b'\n')?;
    let line: Vec<u8> = buffer.drain(..=pos).collect();
    Some(String::from_utf8_lossy(&line).trim().to_string())
}

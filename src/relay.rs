// The relay core — per-message handlers and the orchestrator.
//
// The two emit paths sit behind traits so the handlers can be exercised
// without the network: `StatusPoster` posts one chunk token and returns the
// assigned id, `NotePusher` creates a link push. The real clients implement
// them; tests substitute recorders.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::codec;
use crate::config::Config;
use crate::dedup::DedupTracker;
use crate::pushbullet::client::PushbulletClient;
use crate::pushbullet::stream::TickleStream;
use crate::status::client::StatusApiClient;
use crate::status::stream::StatusStream;
use crate::status::types::{permalink, StatusUpdate};

/// Emits one status update and returns its assigned id.
#[async_trait]
pub trait StatusPoster: Send + Sync {
    async fn post_update(&self, text: &str) -> Result<u64>;
}

/// Creates a link push on the notification service.
#[async_trait]
pub trait NotePusher: Send + Sync {
    async fn push_link(&self, title: &str, body: &str, url: &str) -> Result<()>;
}

#[async_trait]
impl StatusPoster for StatusApiClient {
    async fn post_update(&self, text: &str) -> Result<u64> {
        StatusApiClient::post_update(self, text).await
    }
}

#[async_trait]
impl NotePusher for PushbulletClient {
    async fn push_link(&self, title: &str, body: &str, url: &str) -> Result<()> {
        PushbulletClient::push_link(self, title, body, url).await
    }
}

/// Relay one note body to the status stream.
///
/// The body is chunk-encoded and posted one token per status update, in
/// order, each assigned id recorded in the tracker before the next post.
/// The first post failure aborts the remaining chunks of this note — the
/// error propagates to the caller, which logs it and moves on.
pub async fn relay_note(
    poster: &dyn StatusPoster,
    tracker: &DedupTracker,
    body: &str,
) -> Result<()> {
    info!(bytes = body.len(), "Relaying note to status stream");
    for token in codec::encode_chunks(body) {
        let id = poster.post_update(&token).await?;
        tracker.add(id).await;
        debug!(id, "Posted chunk");
    }
    Ok(())
}

/// Handle one inbound status message.
///
/// Self-echoes (ids this process emitted) are consumed and discarded.
/// Everything else goes through iterative decode; text that never was a
/// chunk token is ignored, a decoded payload is pushed as a link note
/// titled with the author handle and pointing at the status permalink.
pub async fn handle_status(
    pusher: &dyn NotePusher,
    tracker: &DedupTracker,
    status: &StatusUpdate,
) -> Result<()> {
    if tracker.try_consume(status.id).await {
        debug!(id = status.id, "Discarding self-emitted status");
        return Ok(());
    }

    let Some(payload) = codec::decode_fully(&status.text) else {
        return Ok(());
    };

    info!(id = status.id, author = %status.user.screen_name, "Pushing decoded payload");
    pusher
        .push_link(
            &status.user.screen_name,
            &payload,
            &permalink(&status.user.screen_name, status.id),
        )
        .await
}

/// Owns both consumers and runs them for the process lifetime.
pub struct Relay {
    pushbullet: PushbulletClient,
    status_api: StatusApiClient,
    access_token: String,
}

impl Relay {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            pushbullet: PushbulletClient::new(&config.pushbullet_access_token)?,
            status_api: StatusApiClient::new(config)?,
            access_token: config.pushbullet_access_token.clone(),
        })
    }

    /// Run both stream consumers until either terminates.
    ///
    /// Neither loop returns under normal operation — both reconnect
    /// forever — so completing here means something is badly wrong, and
    /// the error propagates out to end the process.
    pub async fn run(self) -> Result<()> {
        let tracker = DedupTracker::new();

        let tickles = TickleStream::new(
            self.pushbullet.clone(),
            Arc::new(self.status_api.clone()),
            tracker.clone(),
            &self.access_token,
        );
        let statuses = StatusStream::new(
            self.status_api,
            Arc::new(self.pushbullet),
            tracker,
        );

        let tickle_task = tokio::spawn(tickles.run());
        let status_task = tokio::spawn(statuses.run());

        // Liveness guard: wait for either task, not both.
        let (which, result) = tokio::select! {
            res = tickle_task => ("notification consumer", res),
            res = status_task => ("status consumer", res),
        };

        match result {
            Ok(Ok(())) => error!(task = which, "Consumer returned unexpectedly"),
            Ok(Err(e)) => error!(task = which, error = %e, "Consumer failed"),
            Err(e) => error!(task = which, error = %e, "Consumer task panicked"),
        }
        anyhow::bail!("{which} terminated; shutting down")
    }
}

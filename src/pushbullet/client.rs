// Pushbullet REST client — a thin reqwest wrapper.
//
// All requests carry the static Access-Token header. Only two endpoints
// are used: fetching recent pushes after a tickle, and creating a link
// push when a status decodes to a payload.

use anyhow::{Context, Result};
use tracing::debug;

use super::types::{LinkPush, Push, PushList};

/// Default base URL for the Pushbullet REST API.
pub const DEFAULT_API_URL: &str = "https://api.pushbullet.com/v2";

/// HTTP client for the Pushbullet REST API.
#[derive(Clone)]
pub struct PushbulletClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl PushbulletClient {
    /// Create a client against the production API.
    pub fn new(access_token: &str) -> Result<Self> {
        Self::with_base_url(access_token, DEFAULT_API_URL)
    }

    /// Create a client against the given base URL (for tests or proxies).
    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pushtweet/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    /// Fetch at most one active push modified after the given epoch-seconds
    /// watermark. Pushbullet returns newest first.
    pub async fn recent_pushes(&self, modified_after: i64) -> Result<Vec<Push>> {
        let url = format!("{}/pushes", self.base_url);

        debug!(modified_after, "Fetching recent pushes");

        let modified_after = modified_after.to_string();
        let response = self
            .client
            .get(&url)
            .header("Access-Token", &self.access_token)
            .query(&[
                ("active", "true"),
                ("limit", "1"),
                ("modified_after", modified_after.as_str()),
            ])
            .send()
            .await
            .context("Push fetch request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Push fetch returned {status}: {body}");
        }

        let list: PushList = response
            .json()
            .await
            .context("Failed to deserialize push list")?;
        Ok(list.pushes)
    }

    /// Create a link push.
    pub async fn push_link(&self, title: &str, body: &str, link_url: &str) -> Result<()> {
        let url = format!("{}/pushes", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("Access-Token", &self.access_token)
            .json(&LinkPush::new(title, body, link_url))
            .send()
            .await
            .context("Push create request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Push create returned {status}: {body}");
        }

        Ok(())
    }
}

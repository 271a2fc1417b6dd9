// Status service REST client — posting updates and opening the user stream.

use anyhow::{Context, Result};
use tracing::debug;

use super::oauth::OAuthSigner;
use super::types::UpdateResponse;
use crate::config::Config;

/// Default base URL for the status REST API.
pub const DEFAULT_API_URL: &str = "https://api.twitter.com/1.1";

/// Default URL for the user stream endpoint.
pub const DEFAULT_STREAM_URL: &str = "https://userstream.twitter.com/1.1/user.json";

/// OAuth-signed HTTP client for the status service.
#[derive(Clone)]
pub struct StatusApiClient {
    client: reqwest::Client,
    signer: OAuthSigner,
    api_url: String,
    stream_url: String,
}

impl StatusApiClient {
    /// Create a client against the production endpoints.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_urls(config, DEFAULT_API_URL, DEFAULT_STREAM_URL)
    }

    /// Create a client against the given endpoints (for tests or proxies).
    pub fn with_urls(config: &Config, api_url: &str, stream_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pushtweet/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            signer: OAuthSigner::new(config),
            api_url: api_url.trim_end_matches('/').to_string(),
            stream_url: stream_url.to_string(),
        })
    }

    /// Post a status update and return the assigned id.
    pub async fn post_update(&self, text: &str) -> Result<u64> {
        let url = format!("{}/statuses/update.json", self.api_url);
        let params = vec![("status".to_string(), text.to_string())];
        let authorization = self.signer.sign("POST", &url, &params)?;

        debug!(chars = text.len(), "Posting status update");

        let response = self
            .client
            .post(&url)
            .header("Authorization", authorization)
            .form(&[("status", text)])
            .send()
            .await
            .context("Status update request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Status update returned {status}: {body}");
        }

        let update: UpdateResponse = response
            .json()
            .await
            .context("Failed to deserialize status update response")?;
        Ok(update.id)
    }

    /// Open the long-lived user stream. The response body is a stream of
    /// newline-delimited JSON frames; the caller owns reading it.
    pub async fn open_stream(&self) -> Result<reqwest::Response> {
        let authorization = self.signer.sign("GET", &self.stream_url, &[])?;

        let response = self
            .client
            .get(&self.stream_url)
            .header("Authorization", authorization)
            .send()
            .await
            .context("Stream subscription request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Stream subscription returned {status}: {body}");
        }

        Ok(response)
    }
}

//! HTTP implementation of [`ChatBackend`].

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use super::{BotReply, ChatBackend, ChatRequest, FeedbackAck, FeedbackRequest};
use crate::error::{Error, Result};

/// JSON-over-POST client for the chat backend.
///
/// # Example
///
/// ```rust,no_run
/// use chat_widget::backend::HttpBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://localhost:8100/")?;
/// assert_eq!(backend.base_url().as_str(), "http://localhost:8100/");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a backend client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the chat service (e.g., "http://localhost:8100/")
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Create a backend client whose requests give up after `timeout`.
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a backend client with a custom reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(&with_trailing_slash(base_url.as_ref()))?;
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, request: &ChatRequest) -> Result<BotReply> {
        let url = self.url("chat")?;
        tracing::debug!(
            url = %url,
            message_id = %request.message_id,
            interrupt = request.is_interrupt(),
            "POST chat"
        );
        let response = self.http.post(url).json(request).send().await?;
        let body = Self::read_body(response).await?;
        BotReply::from_body(&body)
    }

    async fn send_feedback(&self, request: &FeedbackRequest) -> Result<FeedbackAck> {
        let url = self.url("feedback")?;
        tracing::debug!(
            url = %url,
            message_id = %request.message_id,
            feedback = %request.feedback,
            "POST feedback"
        );
        let response = self.http.post(url).json(request).send().await?;
        let body = Self::read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

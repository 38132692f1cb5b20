//! Outbound chat message delivery.
//!
//! Production posts reminder text to the chat platform's webhook endpoint,
//! signing each request body with HMAC-SHA256. Local development uses the
//! console provider, which only logs.

use std::sync::Arc;
use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, info};

use domain::services::MessageDispatch;

use crate::config::MessagingConfig;

/// Errors that can occur during message delivery.
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HMAC signing error: {0}")]
    SigningError(String),

    #[error("Message endpoint returned status {0}")]
    UnexpectedStatus(u16),
}

/// Posts messages to the chat platform webhook.
pub struct WebhookMessageDispatch {
    client: Client,
    url: String,
    secret: String,
}

impl WebhookMessageDispatch {
    /// Create a dispatcher from the messaging configuration.
    pub fn new(config: &MessagingConfig) -> Result<Self, MessagingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
            secret: config.webhook_secret.clone(),
        })
    }

    /// Sign the request body with HMAC-SHA256.
    fn sign_body(&self, body: &str) -> Result<String, MessagingError> {
        type HmacSha256 = Hmac<Sha256>;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| MessagingError::SigningError(e.to_string()))?;
        mac.update(body.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    async fn post(&self, text: &str) -> Result<(), MessagingError> {
        let signature = self.sign_body(text)?;

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/plain; charset=utf-8")
            .header("X-Webhook-Signature", signature)
            .body(text.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MessagingError::UnexpectedStatus(status.as_u16()));
        }

        debug!(status = status.as_u16(), "Posted message to webhook");
        Ok(())
    }
}

#[async_trait::async_trait]
impl MessageDispatch for WebhookMessageDispatch {
    async fn post_message(&self, text: &str) -> anyhow::Result<()> {
        self.post(text).await?;
        Ok(())
    }
}

/// Logs messages instead of delivering them.
pub struct ConsoleMessageDispatch;

#[async_trait::async_trait]
impl MessageDispatch for ConsoleMessageDispatch {
    async fn post_message(&self, text: &str) -> anyhow::Result<()> {
        info!(message = %text, "Console message dispatch");
        Ok(())
    }
}

/// Build the dispatcher selected by configuration.
pub fn build_dispatch(config: &MessagingConfig) -> anyhow::Result<Arc<dyn MessageDispatch>> {
    match config.provider.as_str() {
        "webhook" => Ok(Arc::new(WebhookMessageDispatch::new(config)?)),
        "console" => Ok(Arc::new(ConsoleMessageDispatch)),
        provider => anyhow::bail!("Unknown messaging provider: {}", provider),
    }
}

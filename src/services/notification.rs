//! Slack webhook delivery
//!
//! One POST per run, no retry. The response body is only read to enrich
//! the error when Slack rejects the message.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::models::SlackPayload;
use crate::utils::{CheckerError, CheckerResult};

/// Posts payloads to a Slack incoming webhook
pub struct SlackNotifier {
    http_client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout_secs: u64) -> CheckerResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            webhook_url: webhook_url.into(),
        })
    }

    /// Send one message; any transport error or non-2xx status is fatal
    pub async fn deliver(&self, payload: &SlackPayload) -> CheckerResult<()> {
        debug!(attachments = payload.attachments.len(), "Posting Slack notification");

        let response = self
            .http_client
            .post(&self.webhook_url)
            .json(payload)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::Notification(format!(
                "Slack returned error {}: {}",
                status.as_u16(),
                body
            )));
        }

        info!(status = status.as_u16(), "Slack notification sent");
        Ok(())
    }
}

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use super::Notifier;

pub const ENV_WEBHOOK_URL: &str = "SLACK_WEBHOOK_URL";

/// Posts `{"text": ...}` to an incoming-webhook URL (Slack and compatibles).
pub struct WebhookNotifier {
    webhook_url: Option<String>,
    client: Client,
}

impl WebhookNotifier {
    /// Reads `SLACK_WEBHOOK_URL`. A missing value is not an error here;
    /// every `send` fails instead.
    pub fn from_env(client: Client) -> Self {
        Self {
            webhook_url: std::env::var(ENV_WEBHOOK_URL)
                .ok()
                .filter(|u| !u.trim().is_empty()),
            client,
        }
    }

    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            webhook_url: Some(url.into()),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait::async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            return Err(anyhow!("{ENV_WEBHOOK_URL} is not set"));
        };

        let body = serde_json::json!({ "text": message });
        let rsp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .context("webhook post")?;

        let status = rsp.status();
        if !status.is_success() {
            let text = rsp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "webhook returned {}: {}",
                status.as_u16(),
                text.trim()
            ));
        }
        Ok(())
    }
}

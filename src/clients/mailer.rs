use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::MailConfig;

/// A single transactional message handed to the relay.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    from: String,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// HTTP client for the transactional mail relay.
///
/// When `mail.enabled` is false the client logs the message and reports
/// success, so dev and test runs need no relay.
#[derive(Clone)]
pub struct MailClient {
    client: Client,
    config: MailConfig,
}

impl MailClient {
    pub fn new(config: MailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.request_timeout_seconds.into(),
            ))
            .user_agent("Clubhouse/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build mail client: {e}"))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn admin_address(&self) -> &str {
        &self.config.admin_address
    }

    pub async fn send(&self, email: &OutboundEmail) -> Result<()> {
        if !self.config.enabled {
            debug!("Mail disabled, dropping '{}' to {}", email.subject, email.to);
            return Ok(());
        }

        let body = RelayRequest {
            from: format!("\"{}\" <{}>", self.config.from_name, self.config.from_address),
            to: &email.to,
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Mail relay error: {} - {}", status, text));
        }

        debug!("Sent '{}' to {}", email.subject, email.to);
        Ok(())
    }
}

use crate::config::MailChannelConfig;
use crate::domain::ports::MailTransport;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::error;

/// Posts messages to an HTTP mail relay. One instance per configured
/// channel, each with its own endpoint and credentials.
pub struct HttpMailTransport {
    client: Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl HttpMailTransport {
    pub fn new(config: &MailChannelConfig, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build mail HTTP client");
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        }
    }
}

#[derive(Serialize)]
struct EmailPayload {
    from_addr: String,
    to_addr: String,
    subject: String,
    html_body: String,
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        let payload = EmailPayload {
            from_addr: self.sender.clone(),
            to_addr: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Mail service connection error: {}", e);
                error!("{}", msg);
                AppError::Mail(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Mail service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::Mail(msg));
        }

        Ok(())
    }
}

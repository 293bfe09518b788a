use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::services::messenger::{GatewayConfig, MessagingProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.twilio.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct TwilioClient {
    http: Client,
    base_url: String,
    account_sid: Option<String>,
    auth_token: Option<String>,
}

impl TwilioClient {
    pub fn new(base_url: &str, config: &GatewayConfig) -> anyhow::Result<Arc<dyn MessagingProvider>> {
        let http = Client::builder()
            .user_agent("barbershop-notify/twilio")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build twilio client")?;

        Ok(Arc::new(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
        }) as Arc<dyn MessagingProvider>)
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, account_sid
        )
    }
}

#[async_trait]
impl MessagingProvider for TwilioClient {
    async fn send_text(&self, from: &str, to: &str, body: &str) -> anyhow::Result<String> {
        let (Some(account_sid), Some(auth_token)) = (&self.account_sid, &self.auth_token) else {
            anyhow::bail!("twilio credentials are not configured");
        };

        let response = self
            .http
            .post(self.messages_url(account_sid))
            .basic_auth(account_sid, Some(auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await
            .context("twilio request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error: TwilioError = response.json().await.unwrap_or_default();
            anyhow::bail!(
                "twilio api returned {} (code {}): {}",
                status.as_u16(),
                error.code.map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
                error.message.unwrap_or_else(|| "unknown error".to_string())
            );
        }

        let message: TwilioMessage = response
            .json()
            .await
            .context("twilio returned an unreadable message resource")?;
        Ok(message.sid)
    }
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Default, Deserialize)]
struct TwilioError {
    code: Option<i64>,
    message: Option<String>,
}

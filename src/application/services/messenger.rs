use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    errors::DeliveryError,
    models::{AttemptOutcome, DeliveryAttempt, SendOutcome, SkipReason},
    value_objects::{WhatsAppNumber, channel_address},
};

pub const MAX_RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_FROM_NUMBER: &str = "+14155238886";

/// Outbound text channel of a messaging provider. One call is one delivery
/// attempt; `from` and `to` already carry the channel prefix.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_text(&self, from: &str, to: &str, body: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub from_number: String,
    pub enabled: bool,
}

impl GatewayConfig {
    pub fn has_credentials(&self) -> bool {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.account_sid) && present(&self.auth_token)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: DEFAULT_FROM_NUMBER.to_string(),
            enabled: true,
        }
    }
}

/// Linear backoff: attempt `n` failing waits `base_delay * n` before the
/// next one.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            base_delay: RETRY_DELAY,
        }
    }
}

#[derive(Clone)]
pub struct MessagingGateway {
    provider: Arc<dyn MessagingProvider>,
    config: GatewayConfig,
    retry: RetryPolicy,
    cancel: CancellationToken,
    runtime: Handle,
}

impl MessagingGateway {
    /// Sends run on `runtime`, so `send_whatsapp` may be called from any
    /// thread, including ones outside the runtime.
    pub fn new(provider: Arc<dyn MessagingProvider>, config: GatewayConfig, runtime: Handle) -> Self {
        Self {
            provider,
            config,
            retry: RetryPolicy::default(),
            cancel: CancellationToken::new(),
            runtime,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_available(&self) -> bool {
        self.config.enabled && self.config.has_credentials()
    }

    /// Aborts every send currently waiting between attempts. Sends that are
    /// mid-call finish that call first.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Delivers `message` on a background task. Dropping the handle leaves
    /// the send running.
    pub fn send_whatsapp(
        &self,
        phone_number: &str,
        message: &str,
    ) -> JoinHandle<Result<SendOutcome, DeliveryError>> {
        let gateway = self.clone();
        let phone_number = phone_number.to_string();
        let message = message.to_string();
        self.runtime
            .spawn(async move { gateway.deliver(&phone_number, &message).await })
    }

    async fn deliver(&self, phone_number: &str, message: &str) -> Result<SendOutcome, DeliveryError> {
        if !self.config.enabled {
            tracing::info!(phone = phone_number, body = message, "WhatsApp disabled, simulating send");
            return Ok(SendOutcome::Skipped(SkipReason::Disabled));
        }
        if !self.config.has_credentials() {
            tracing::warn!(phone = phone_number, "WhatsApp credentials not configured, message not sent");
            return Ok(SendOutcome::Skipped(SkipReason::MissingCredentials));
        }

        let recipient = WhatsAppNumber::normalize(phone_number)?;
        let from = channel_address(&self.config.from_number);
        let to = recipient.address();
        let mut attempts = Vec::new();
        let record = |attempt: u32, outcome: AttemptOutcome| DeliveryAttempt {
            attempt,
            recipient: recipient.digits().to_string(),
            body: message.to_string(),
            outcome,
        };

        for attempt in 1..=self.retry.max_attempts {
            match self.provider.send_text(&from, &to, message).await {
                Ok(message_id) => {
                    tracing::info!(attempt, phone = %recipient, message_id = %message_id, "WhatsApp message sent");
                    attempts.push(record(
                        attempt,
                        AttemptOutcome::Sent {
                            message_id: message_id.clone(),
                        },
                    ));
                    return Ok(SendOutcome::Sent {
                        message_id,
                        attempts,
                    });
                }
                Err(err) if attempt >= self.retry.max_attempts => {
                    tracing::error!(
                        attempt,
                        phone = %recipient,
                        error = %err,
                        "WhatsApp delivery failed after all retries"
                    );
                    attempts.push(record(
                        attempt,
                        AttemptOutcome::Failed {
                            reason: err.to_string(),
                        },
                    ));
                    return Err(DeliveryError::RetriesExhausted {
                        attempts,
                        source: err,
                    });
                }
                Err(err) => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        attempt,
                        phone = %recipient,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "WhatsApp delivery attempt failed, retrying"
                    );
                    attempts.push(record(
                        attempt,
                        AttemptOutcome::Retrying {
                            reason: err.to_string(),
                        },
                    ));

                    tokio::select! {
                        _ = self.cancel.cancelled() => {
                            tracing::warn!(attempt, phone = %recipient, "WhatsApp retry interrupted");
                            return Err(DeliveryError::Interrupted {
                                attempt,
                                delay,
                                attempts,
                            });
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        // Only reachable with a policy of zero attempts.
        Err(DeliveryError::RetriesExhausted {
            attempts,
            source: anyhow::anyhow!("retry policy allows no attempts"),
        })
    }
}

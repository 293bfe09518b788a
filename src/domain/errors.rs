use std::time::Duration;

use thiserror::Error;

use crate::domain::models::DeliveryAttempt;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Terminal outcome of a WhatsApp send that did not reach the provider
/// successfully.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid recipient: {0:?}")]
    InvalidRecipient(String),
    #[error("delivery failed after {} attempts: {source}", .attempts.len())]
    RetriesExhausted {
        attempts: Vec<DeliveryAttempt>,
        #[source]
        source: anyhow::Error,
    },
    #[error("delivery interrupted after attempt {attempt} while waiting {delay:?}")]
    Interrupted {
        attempt: u32,
        delay: Duration,
        attempts: Vec<DeliveryAttempt>,
    },
}

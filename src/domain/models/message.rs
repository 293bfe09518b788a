use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttemptOutcome {
    Sent { message_id: String },
    Retrying { reason: String },
    Failed { reason: String },
}

/// One provider call made while delivering a single message. Lives only for
/// the duration of the send that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub attempt: u32,
    pub recipient: String,
    pub body: String,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    MissingCredentials,
}

/// Successful completion of a send. `Skipped` covers the no-op paths where
/// the provider was never contacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SendOutcome {
    Sent {
        message_id: String,
        attempts: Vec<DeliveryAttempt>,
    },
    Skipped(SkipReason),
}

impl SendOutcome {
    pub fn message_id(&self) -> Option<&str> {
        match self {
            SendOutcome::Sent { message_id, .. } => Some(message_id),
            SendOutcome::Skipped(_) => None,
        }
    }

    pub fn attempts(&self) -> &[DeliveryAttempt] {
        match self {
            SendOutcome::Sent { attempts, .. } => attempts,
            SendOutcome::Skipped(_) => &[],
        }
    }
}

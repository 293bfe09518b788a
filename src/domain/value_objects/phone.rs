use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DeliveryError;

pub const DEFAULT_COUNTRY_CODE: &str = "55";
pub const CHANNEL_PREFIX: &str = "whatsapp:";

/// Destination number in the form the provider expects: digits only, with
/// the country code in front.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WhatsAppNumber(String);

impl WhatsAppNumber {
    pub fn normalize(raw: &str) -> Result<Self, DeliveryError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(DeliveryError::InvalidRecipient(raw.to_string()));
        }
        if digits.starts_with(DEFAULT_COUNTRY_CODE) {
            Ok(Self(digits))
        } else {
            Ok(Self(format!("{DEFAULT_COUNTRY_CODE}{digits}")))
        }
    }

    pub fn digits(&self) -> &str {
        &self.0
    }

    /// `whatsapp:+5511999999999`
    pub fn address(&self) -> String {
        format!("{CHANNEL_PREFIX}+{}", self.0)
    }
}

impl fmt::Display for WhatsAppNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

/// Prefixes an origin number such as `+14155238886` with the channel marker,
/// leaving it alone when it already carries one.
pub fn channel_address(number: &str) -> String {
    if number.starts_with(CHANNEL_PREFIX) {
        number.to_string()
    } else {
        format!("{CHANNEL_PREFIX}{number}")
    }
}

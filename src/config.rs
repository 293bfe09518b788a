use std::env::var;

use dotenvy::dotenv;
use thiserror::Error;

use crate::{
    application::services::messenger::{DEFAULT_FROM_NUMBER, GatewayConfig},
    infrastructure::messaging::twilio::DEFAULT_BASE_URL,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("An error occured while parsing {key} env param: {value:?} is not a boolean")]
    InvalidFlag { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub twilio_base_url: String,
    /// `RUST_LOG` as seen after `.env` is loaded.
    pub log_filter: Option<String>,
}

impl Config {
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|key| var(key).ok())
    }

    /// Builds the configuration from any key/value source. Blank values are
    /// treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let enabled = match get("WHATSAPP_ENABLED") {
            Some(value) => parse_flag("WHATSAPP_ENABLED", &value)?,
            None => true,
        };

        Ok(Config {
            gateway: GatewayConfig {
                account_sid: get("TWILIO_ACCOUNT_SID"),
                auth_token: get("TWILIO_AUTH_TOKEN"),
                from_number: get("TWILIO_WHATSAPP_FROM")
                    .unwrap_or_else(|| DEFAULT_FROM_NUMBER.to_string()),
                enabled,
            },
            twilio_base_url: get("TWILIO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            log_filter: get("RUST_LOG"),
        })
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            key,
            value: value.to_string(),
        }),
    }
}

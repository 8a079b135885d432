//! Service configuration read from the environment

use crate::flow::CallDirection;
use crate::prompts::DEFAULT_BRAND_NAME;
use crate::webhook::Capabilities;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/confirmation.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: String,
    /// Brand spoken in the greeting
    pub brand_name: String,
    /// Menu schema handed to the platform at registration
    pub schema_path: PathBuf,
    /// Optional JSON customer directory; the demo customer is used otherwise
    pub customers_path: Option<PathBuf>,
    /// Which side of the call the customer is on
    pub direction: CallDirection,
    pub capabilities: Capabilities,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = get("IVR_DB_PATH").unwrap_or_else(|| {
            let home = get("HOME").unwrap_or_else(|| "/tmp".to_string());
            format!("{home}/.ivr-webhook/outcomes.db")
        });

        let port = get("IVR_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let conversational = parse_flag(get("IVR_CONVERSATIONAL"));

        Self {
            port,
            db_path,
            brand_name: get("IVR_BRAND_NAME").unwrap_or_else(|| DEFAULT_BRAND_NAME.to_string()),
            schema_path: get("IVR_SCHEMA_PATH")
                .map_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH), PathBuf::from),
            customers_path: get("IVR_CUSTOMERS_PATH").map(PathBuf::from),
            direction: parse_direction(get("IVR_DIRECTION")),
            capabilities: Capabilities {
                stream: parse_flag(get("IVR_STREAM")),
                // Conversational mode only makes sense on top of transcription
                transcribe: conversational || parse_flag(get("IVR_TRANSCRIBE")),
                conversational,
            },
        }
    }
}

fn parse_direction(value: Option<String>) -> CallDirection {
    match value.as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("incoming") => CallDirection::Incoming,
        _ => CallDirection::Outgoing,
    }
}

fn parse_flag(value: Option<String>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

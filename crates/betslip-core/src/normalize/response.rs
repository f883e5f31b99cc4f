//! Generation endpoint response envelope.
//!
//! `{ "success": true, "betslips": [...], "message": "..." }` on success,
//! `{ "success": false, "error": "..." }` otherwise.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::parser::{normalize_betslip_at, text};
use super::types::Betslip;

/// Used when a failed response carries no `error` text.
pub const DEFAULT_GENERATION_ERROR: &str = "Betslip generation failed";
/// Used when a successful response carries no betslips and no `message`.
pub const NO_BETSLIPS_MESSAGE: &str =
    "No betslips could be generated for this target odd. Try another value.";

/// Decoded body of a 2xx generation response.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated {
        betslips: Vec<Betslip>,
        message: Option<String>,
    },
    /// Well-formed response with `success` not set; carries `error` verbatim.
    Rejected { error: String },
}

impl GenerationOutcome {
    /// Message to show when a successful generation came back empty.
    pub fn empty_message(&self) -> Option<&str> {
        match self {
            Self::Generated { betslips, message } if betslips.is_empty() => {
                Some(message.as_deref().unwrap_or(NO_BETSLIPS_MESSAGE))
            }
            _ => None,
        }
    }
}

/// Decode a generation response body and normalize its betslips.
pub fn parse_generation_response(body: &Value) -> GenerationOutcome {
    parse_generation_response_at(body, Utc::now())
}

pub fn parse_generation_response_at(body: &Value, now: DateTime<Utc>) -> GenerationOutcome {
    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !success {
        return GenerationOutcome::Rejected {
            error: body
                .get("error")
                .and_then(text)
                .unwrap_or_else(|| DEFAULT_GENERATION_ERROR.to_string()),
        };
    }

    let betslips = body
        .get("betslips")
        .and_then(Value::as_array)
        .map(|raw| {
            raw.iter()
                .enumerate()
                .map(|(index, slip)| normalize_betslip_at(slip, index, now))
                .collect()
        })
        .unwrap_or_default();

    GenerationOutcome::Generated {
        betslips,
        message: body.get("message").and_then(text),
    }
}

//! Prediction text resolution.
//!
//! Payloads describe a prediction in several ways depending on their age.
//! Resolvers run in order and the first that yields text wins.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::parser::text;

/// Shown when no resolver finds anything.
pub const NO_PREDICTION: &str = "No prediction available";

/// Compact totals picks such as `OVER2.5` or `UNDER 3`.
static TOTALS_PICK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(OVER|UNDER)\s*(\d+(?:\.\d+)?)?$").expect("static regex is valid")
});

type Resolver = fn(&Value) -> Option<String>;

const RESOLVERS: [Resolver; 4] = [
    full_prediction,
    typed_prediction,
    pick_prediction,
    plain_prediction,
];

/// Resolve the display prediction of a raw selection.
pub fn resolve_prediction(raw: &Value) -> String {
    RESOLVERS
        .iter()
        .find_map(|resolve| resolve(raw))
        .unwrap_or_else(|| NO_PREDICTION.to_string())
}

fn full_prediction(raw: &Value) -> Option<String> {
    text(raw.get("fullPrediction")?)
}

fn typed_prediction(raw: &Value) -> Option<String> {
    let kind = text(raw.get("predictionType")?)?;
    let value = text(raw.get("predictionValue")?)?;
    describe_typed(&kind, &value)
}

fn pick_prediction(raw: &Value) -> Option<String> {
    let pick = text(raw.get("pick")?)?;
    Some(describe_pick(&pick))
}

fn plain_prediction(raw: &Value) -> Option<String> {
    text(raw.get("prediction")?)
}

/// Phrase for a `(predictionType, predictionValue)` pair.
///
/// Returns `None` for types outside the table so later resolvers get a turn.
pub fn describe_typed(kind: &str, value: &str) -> Option<String> {
    let kind = kind.trim().to_ascii_uppercase();
    let value = value.trim();
    match kind.as_str() {
        "OVER" => Some(format!("Over {value}")),
        "UNDER" => Some(format!("Under {value}")),
        "BTTS" => {
            let answer = if is_affirmative(value) { "yes" } else { "no" };
            Some(format!("Both teams to score: {answer}"))
        }
        "1X2" => Some(
            outcome_phrase(value).map_or_else(|| value.to_string(), str::to_string),
        ),
        "DC" => Some(format!("Double chance: {value}")),
        "1" | "X" | "2" => outcome_phrase(&kind).map(str::to_string),
        _ => None,
    }
}

/// Expand a compact totals pick; any other pick passes through verbatim.
pub fn describe_pick(pick: &str) -> String {
    let Some(caps) = TOTALS_PICK_RE.captures(pick.trim()) else {
        return pick.to_string();
    };
    let direction = if &caps[1] == "OVER" { "Over" } else { "Under" };
    match caps.get(2) {
        Some(line) => format!("{direction} {}", line.as_str()),
        None => direction.to_string(),
    }
}

fn outcome_phrase(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "1" => Some("Home win"),
        "X" => Some("Draw"),
        "2" => Some("Away win"),
        _ => None,
    }
}

fn is_affirmative(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "oui"
    )
}

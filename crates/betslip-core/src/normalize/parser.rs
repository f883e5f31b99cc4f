//! Betslip normalizer.
//!
//! Implements a tolerant reader: fresh generation responses and saved
//! history records use different field names, and any field may be missing.
//! Every canonical field is resolved through an ordered alias list and ends
//! in a literal default, so normalization never fails.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::prediction::resolve_prediction;
use super::types::{Betslip, MatchStatus, Selection, SlipStatus};

pub const DEFAULT_STAKE: f64 = 10.0;
pub const DEFAULT_TOTAL_ODD: f64 = 1.0;
pub const DEFAULT_ODD: f64 = 1.0;
pub const DEFAULT_CONFIDENCE: u8 = 70;
pub const DEFAULT_LEAGUE: &str = "Unknown league";
pub const DEFAULT_TEAM1: &str = "Home";
pub const DEFAULT_TEAM2: &str = "Away";
pub const DEFAULT_MATCH_TIME: &str = "TBD";
pub const DEFAULT_MATCH_ID: &str = "unknown-match";

const SYNTHETIC_ID_PREFIX: &str = "betslip";

// Alias lists, highest precedence first.
const BETSLIP_ID_KEYS: &[&str] = &["id", "_id"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "createdAt"];
const SELECTION_LIST_KEYS: &[&str] = &["selections", "matches"];
const STAKE_KEYS: &[&str] = &["stake"];
const TOTAL_ODD_KEYS: &[&str] = &["totalOdd", "totalOdds"];
const POTENTIAL_RETURN_KEYS: &[&str] = &["potentialReturn", "potentialWin"];
const MATCH_ID_KEYS: &[&str] = &["matchId", "fixtureId"];
const LEAGUE_KEYS: &[&str] = &["league", "competition"];
const TEAM1_KEYS: &[&str] = &["team1", "homeTeam"];
const TEAM2_KEYS: &[&str] = &["team2", "awayTeam"];
const ODD_KEYS: &[&str] = &["odd", "odds"];
const CONFIDENCE_KEYS: &[&str] = &["confidence"];
const MATCH_TIME_KEYS: &[&str] = &["matchTime", "kickoff"];

/// Normalize one raw betslip. `index` is its position in the response and
/// only feeds the synthesized id when the payload carries none.
pub fn normalize_betslip(raw: &Value, index: usize) -> Betslip {
    normalize_betslip_at(raw, index, Utc::now())
}

/// [`normalize_betslip`] with an explicit clock for id and timestamp defaults.
pub fn normalize_betslip_at(raw: &Value, index: usize, now: DateTime<Utc>) -> Betslip {
    let id = first_text(raw, BETSLIP_ID_KEYS).unwrap_or_else(|| {
        format!("{SYNTHETIC_ID_PREFIX}-{}-{index}", now.timestamp_millis())
    });

    let timestamp = TIMESTAMP_KEYS
        .iter()
        .find_map(|key| raw.get(key).and_then(timestamp_text))
        .unwrap_or_else(|| iso8601(now));

    let selections = SELECTION_LIST_KEYS
        .iter()
        .find_map(|key| raw.get(key).and_then(Value::as_array))
        .map(|entries| {
            entries
                .iter()
                .enumerate()
                .map(|(pos, entry)| normalize_selection_with(entry, || format!("{id}-{pos}")))
                .collect()
        })
        .unwrap_or_default();

    let stake = first_positive(raw, STAKE_KEYS).unwrap_or(DEFAULT_STAKE);
    let total_odd = first_positive(raw, TOTAL_ODD_KEYS).unwrap_or(DEFAULT_TOTAL_ODD);
    // A server-supplied return always wins over the local product.
    let potential_return =
        first_positive(raw, POTENTIAL_RETURN_KEYS).unwrap_or(stake * total_odd);

    Betslip {
        id,
        timestamp,
        title: raw.get("title").and_then(text),
        selections,
        stake,
        total_odd,
        potential_return,
        status: raw
            .get("status")
            .and_then(text)
            .map(|s| SlipStatus::parse_lenient(&s))
            .unwrap_or_default(),
        accuracy: raw.get("accuracy").and_then(text),
    }
}

/// Normalize one raw selection (a `selections` entry or a legacy `matches` entry).
pub fn normalize_selection(raw: &Value) -> Selection {
    normalize_selection_with(raw, || DEFAULT_MATCH_ID.to_string())
}

fn normalize_selection_with(raw: &Value, fallback_id: impl FnOnce() -> String) -> Selection {
    Selection {
        match_id: first_text(raw, MATCH_ID_KEYS).unwrap_or_else(fallback_id),
        league: first_text(raw, LEAGUE_KEYS).unwrap_or_else(|| DEFAULT_LEAGUE.to_string()),
        team1: first_text(raw, TEAM1_KEYS).unwrap_or_else(|| DEFAULT_TEAM1.to_string()),
        team2: first_text(raw, TEAM2_KEYS).unwrap_or_else(|| DEFAULT_TEAM2.to_string()),
        prediction: resolve_prediction(raw),
        odd: first_positive(raw, ODD_KEYS).unwrap_or(DEFAULT_ODD),
        confidence: CONFIDENCE_KEYS
            .iter()
            .find_map(|key| raw.get(key).and_then(number))
            .map_or(DEFAULT_CONFIDENCE, clamp_confidence),
        match_time: first_text(raw, MATCH_TIME_KEYS)
            .unwrap_or_else(|| DEFAULT_MATCH_TIME.to_string()),
        status: raw
            .get("status")
            .and_then(text)
            .map(|s| MatchStatus::parse_lenient(&s))
            .unwrap_or_default(),
    }
}

/// Text form of a scalar. Blank strings count as absent; Mongo
/// `{"$oid": ...}` wrappers are unwrapped.
pub(crate) fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("$oid").and_then(text),
        _ => None,
    }
}

/// Numeric value, accepting numeric strings.
fn number(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn first_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| raw.get(key).and_then(text))
}

/// First strictly positive number; zero stakes and odds count as missing.
fn first_positive(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|key| raw.get(key).and_then(number).filter(|v| *v > 0.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_confidence(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn timestamp_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(iso8601),
        other => text(other),
    }
}

fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

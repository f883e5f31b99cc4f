//! Canonical betslip shapes handed to the display layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kick-off state of a single match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Finished => "finished",
        }
    }

    /// Map the status strings seen in payloads; anything unrecognised is upcoming.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "in_play" | "inplay" | "in-play" => Self::Live,
            "finished" | "ft" | "ended" | "complete" | "completed" => Self::Finished,
            _ => Self::Upcoming,
        }
    }
}

/// Settlement state of a saved betslip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SlipStatus {
    #[default]
    Pending,
    Won,
    Lost,
}

impl SlipStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "won" | "win" | "success" => Self::Won,
            "lost" | "lose" | "failed" => Self::Lost,
            _ => Self::Pending,
        }
    }
}

/// Confidence bucket used to colour a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub const fn from_confidence(confidence: u8) -> Self {
        match confidence {
            80.. => Self::High,
            60..=79 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// One leg of a betslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub match_id: String,
    pub league: String,
    pub team1: String,
    pub team2: String,
    /// Human-readable prediction, e.g. `"Over 2.5"` or `"Home win"`.
    pub prediction: String,
    pub odd: f64,
    /// 0 to 100.
    pub confidence: u8,
    pub match_time: String,
    pub status: MatchStatus,
}

impl Selection {
    pub const fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }
}

/// A bundle of selections with an aggregate odd and stake.
///
/// Serializes with the same field names the normalizer reads, so a stored
/// betslip normalizes back to itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Betslip {
    pub id: String,
    /// ISO-8601 creation time.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub selections: Vec<Selection>,
    pub stake: f64,
    pub total_odd: f64,
    pub potential_return: f64,
    #[serde(default)]
    pub status: SlipStatus,
    /// Settled accuracy as recorded: a percentage or a band such as `"high"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<String>,
}

/// Accuracy percentage from which a settled prediction counts as accurate.
pub const ACCURATE_THRESHOLD: f64 = 70.0;

impl Betslip {
    pub fn match_count(&self) -> usize {
        self.selections.len()
    }

    /// Whether the recorded accuracy is `"high"` or at least [`ACCURATE_THRESHOLD`].
    pub fn is_accurate(&self) -> bool {
        self.accuracy.as_deref().is_some_and(|raw| {
            let raw = raw.trim();
            raw.eq_ignore_ascii_case("high")
                || raw
                    .trim_end_matches('%')
                    .parse::<f64>()
                    .is_ok_and(|pct| pct >= ACCURATE_THRESHOLD)
        })
    }

    /// Raw JSON form, suitable for the saved-history store.
    pub fn to_raw(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_threshold() {
        let slip = |accuracy: Option<&str>| Betslip {
            id: "s".into(),
            timestamp: "2026-01-01T00:00:00.000Z".into(),
            title: None,
            selections: Vec::new(),
            stake: 10.0,
            total_odd: 1.0,
            potential_return: 10.0,
            status: SlipStatus::Pending,
            accuracy: accuracy.map(str::to_string),
        };
        assert!(slip(Some("high")).is_accurate());
        assert!(slip(Some("High")).is_accurate());
        assert!(slip(Some("70")).is_accurate());
        assert!(slip(Some("85%")).is_accurate());
        assert!(!slip(Some("69.5")).is_accurate());
        assert!(!slip(Some("low")).is_accurate());
        assert!(!slip(None).is_accurate());
    }

    #[test]
    fn confidence_bands() {
        assert_eq!(ConfidenceBand::from_confidence(95), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(80), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(60), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(59), ConfidenceBand::Low);
    }

    #[test]
    fn status_parsing_is_lenient() {
        assert_eq!(MatchStatus::parse_lenient("LIVE"), MatchStatus::Live);
        assert_eq!(MatchStatus::parse_lenient("FT"), MatchStatus::Finished);
        assert_eq!(MatchStatus::parse_lenient("À VENIR"), MatchStatus::Upcoming);
        assert_eq!(SlipStatus::parse_lenient("success"), SlipStatus::Won);
        assert_eq!(SlipStatus::parse_lenient("en attente"), SlipStatus::Pending);
    }
}

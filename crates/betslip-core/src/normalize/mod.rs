//! Betslip normalization.
//!
//! Reconciles generation responses and saved history records into the
//! canonical [`Betslip`]/[`Selection`] shapes. Normalization is total: every
//! branch ends in a default, so malformed upstream data never blocks display.

mod parser;
mod prediction;
mod response;
mod types;

pub use parser::{
    DEFAULT_CONFIDENCE, DEFAULT_LEAGUE, DEFAULT_MATCH_ID, DEFAULT_MATCH_TIME, DEFAULT_ODD,
    DEFAULT_STAKE, DEFAULT_TEAM1, DEFAULT_TEAM2, DEFAULT_TOTAL_ODD, normalize_betslip,
    normalize_betslip_at, normalize_selection,
};
pub(crate) use parser::text;
pub use prediction::{NO_PREDICTION, describe_pick, describe_typed, resolve_prediction};
pub use response::{
    DEFAULT_GENERATION_ERROR, GenerationOutcome, NO_BETSLIPS_MESSAGE,
    parse_generation_response, parse_generation_response_at,
};
pub use types::{
    ACCURATE_THRESHOLD, Betslip, ConfidenceBand, MatchStatus, Selection, SlipStatus,
};

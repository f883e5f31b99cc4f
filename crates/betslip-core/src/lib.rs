//! Betslip Core Library
//!
//! Shared functionality for Betslip components:
//! - Access gating for betslip generation (subscription, admin, credits)
//! - Target-odd input validation
//! - Betslip normalization from generated and saved payloads
//! - Saved-history manipulation and statistics
//! - Configuration resolution, SQLite helpers and tracing setup

pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod normalize;
pub mod odds;
pub mod stats;
pub mod tracing_init;

pub use access::{AccessDenied, AccessGate, CreditStatus, SubscriptionTier, UserAccessState};
pub use config::Config;
pub use error::{Error, Result};
pub use normalize::{Betslip, MatchStatus, Selection, normalize_betslip, normalize_selection};
pub use odds::{TargetOddInput, ValidationError, validate_target_odd};

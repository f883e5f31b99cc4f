//! Database row types.

use sqlx::FromRow;

/// One saved betslip as stored: its raw JSON payload and list position.
#[derive(Debug, Clone, FromRow)]
pub struct SavedBetslipRow {
    pub position: i64,
    pub payload: String,
    pub updated_at: i64,
}

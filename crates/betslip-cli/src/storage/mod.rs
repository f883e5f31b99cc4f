//! `SQLite` storage for saved betslips.
//!
//! The table holds raw records in display order; the history operations in
//! `betslip_core::history` only ever read or replace the whole collection.

mod db;
mod models;
mod queries;

pub use db::{DatabaseError, HistoryDatabase};
pub use models::SavedBetslipRow;

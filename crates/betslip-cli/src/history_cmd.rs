//! Saved-history subcommands: list, show, delete, stats.

use std::io::Write;

use betslip_core::history::{delete_betslip, load_betslips};
use betslip_core::stats::HistoryStats;
use chrono::DateTime;

use crate::fmt::{write_betslip_detail, write_betslip_summary, write_stats};
use crate::storage::HistoryDatabase;

/// History subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved betslips.
    List,
    /// Show one saved betslip with its selections.
    Show {
        /// Betslip ID.
        id: String,
    },
    /// Delete one saved betslip.
    Delete {
        /// Betslip ID.
        id: String,
    },
    /// Show win/loss statistics.
    Stats,
}

/// Execute a history subcommand.
pub async fn run(
    action: HistoryAction,
    db: &HistoryDatabase,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match action {
        HistoryAction::List => {
            let slips = load_betslips(db).await?;
            if slips.is_empty() {
                writeln!(out, "No saved betslips")?;
            }
            for slip in &slips {
                write_betslip_summary(out, slip)?;
            }
        }
        HistoryAction::Show { id } => {
            let slips = load_betslips(db).await?;
            let slip = slips
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| anyhow::anyhow!("No saved betslip with id {id}"))?;
            write_betslip_detail(out, slip)?;
        }
        HistoryAction::Delete { id } => {
            if !delete_betslip(db, &id).await? {
                anyhow::bail!("No saved betslip with id {id}");
            }
            writeln!(out, "Deleted betslip {id}")?;
        }
        HistoryAction::Stats => {
            let slips = load_betslips(db).await?;
            write_stats(out, &HistoryStats::from_betslips(&slips))?;
            let updated = db
                .last_updated()
                .await?
                .and_then(|t| DateTime::from_timestamp(t, 0));
            if let Some(updated) = updated {
                writeln!(out, "  Updated:  {}", updated.format("%Y-%m-%d %H:%M UTC"))?;
            }
        }
    }
    Ok(())
}

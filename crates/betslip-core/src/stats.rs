//! Profile statistics over the saved history.

use crate::normalize::{Betslip, SlipStatus};

/// Aggregate figures shown on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistoryStats {
    pub total: usize,
    pub won: usize,
    pub lost: usize,
    pub pending: usize,
    /// Whole percent of saved betslips that won.
    pub success_rate: u8,
    /// Saved betslips whose recorded accuracy counts as accurate.
    pub accurate: usize,
    /// Whole percent of saved betslips that were accurate.
    pub accuracy_rate: u8,
    /// Sum of potential returns over won betslips.
    pub total_winnings: f64,
}

impl HistoryStats {
    pub fn from_betslips(betslips: &[Betslip]) -> Self {
        let mut stats = Self {
            total: betslips.len(),
            ..Self::default()
        };
        for slip in betslips {
            if slip.is_accurate() {
                stats.accurate += 1;
            }
            match slip.status {
                SlipStatus::Won => {
                    stats.won += 1;
                    stats.total_winnings += slip.potential_return;
                }
                SlipStatus::Lost => stats.lost += 1,
                SlipStatus::Pending => stats.pending += 1,
            }
        }
        stats.success_rate = percent(stats.won, stats.total);
        stats.accuracy_rate = percent(stats.accurate, stats.total);
        stats
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u8
}

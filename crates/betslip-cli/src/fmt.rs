//! Betslip output formatting helpers.

use std::io::{self, Write};

use betslip_core::stats::HistoryStats;
use betslip_core::{Betslip, CreditStatus, MatchStatus, Selection, UserAccessState};

/// One line per betslip, for lists.
pub fn write_betslip_summary(w: &mut impl Write, slip: &Betslip) -> io::Result<()> {
    writeln!(
        w,
        "  {:<28} {:>2} matches  odd {:>6.2}  stake {:>7.2}  return {:>8.2}  {}",
        slip.id,
        slip.match_count(),
        slip.total_odd,
        slip.stake,
        slip.potential_return,
        slip.status.as_str(),
    )
}

pub fn write_betslip_detail(w: &mut impl Write, slip: &Betslip) -> io::Result<()> {
    writeln!(w, "  Betslip:  {}", slip.id)?;
    if let Some(title) = &slip.title {
        writeln!(w, "  Title:    {title}")?;
    }
    writeln!(w, "  Created:  {}", slip.timestamp)?;
    writeln!(w, "  Status:   {}", slip.status.as_str())?;
    writeln!(w, "  Matches:  {}", slip.match_count())?;
    writeln!(w, "  Odd:      {:.2}", slip.total_odd)?;
    writeln!(w, "  Stake:    {:.2}", slip.stake)?;
    writeln!(w, "  Return:   {:.2}", slip.potential_return)?;
    for (pos, selection) in slip.selections.iter().enumerate() {
        writeln!(w)?;
        write_selection(w, pos + 1, selection)?;
    }
    Ok(())
}

pub fn write_selection(w: &mut impl Write, number: usize, s: &Selection) -> io::Result<()> {
    writeln!(w, "  {number}. {} vs {}", s.team1, s.team2)?;
    writeln!(w, "     League:     {}", s.league)?;
    writeln!(w, "     Kickoff:    {}", s.match_time)?;
    writeln!(w, "     Prediction: {}", s.prediction)?;
    writeln!(w, "     Odd:        {:.2}", s.odd)?;
    writeln!(
        w,
        "     Confidence: {}% ({})",
        s.confidence,
        s.confidence_band().as_str()
    )?;
    if s.status != MatchStatus::Upcoming {
        writeln!(w, "     Status:     {}", s.status.as_str())?;
    }
    Ok(())
}

pub fn write_stats(w: &mut impl Write, stats: &HistoryStats) -> io::Result<()> {
    writeln!(w, "  Saved:    {}", stats.total)?;
    writeln!(w, "  Won:      {}", stats.won)?;
    writeln!(w, "  Lost:     {}", stats.lost)?;
    writeln!(w, "  Pending:  {}", stats.pending)?;
    writeln!(w, "  Success:  {}%", stats.success_rate)?;
    writeln!(w, "  Accuracy: {}%", stats.accuracy_rate)?;
    writeln!(w, "  Winnings: {:.2}", stats.total_winnings)?;
    Ok(())
}

pub fn write_account(
    w: &mut impl Write,
    state: &UserAccessState,
    status: CreditStatus,
) -> io::Result<()> {
    if let Some(username) = &state.username {
        writeln!(w, "  User:     {username}")?;
    }
    if state.is_authenticated {
        writeln!(w, "  Tier:     {}", state.subscription_tier.label())?;
        if let Some(end) = state.subscription_end_date {
            writeln!(w, "  Until:    {}", end.format("%Y-%m-%d %H:%M UTC"))?;
        }
        writeln!(w, "  Credits:  {}", state.credits)?;
    }
    writeln!(w, "  Access:   {status}")?;
    if state.is_authenticated && !status.allows_generation() {
        writeln!(w, "  Top up credits or subscribe to keep generating betslips.")?;
    }
    Ok(())
}

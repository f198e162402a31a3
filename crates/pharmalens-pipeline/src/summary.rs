//! Report-facing aggregates: per-strategy counts and the upcoming
//! patent-expiry timeline.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decision::{MoleculeDecision, Strategy};
use crate::fto::{FtoAssessment, FtoStatus};

/// Counts per strategy across the ranked list, plus molecules excluded for
/// missing signals. The harness surfaces these; they are never swallowed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub total: usize,
    pub generic: usize,
    pub license: usize,
    pub wait: usize,
    pub drop: usize,
    pub skipped: usize,
}

pub fn summarize(decisions: &[MoleculeDecision], skipped: usize) -> DecisionSummary {
    let mut summary = DecisionSummary {
        total: decisions.len(),
        skipped,
        ..Default::default()
    };
    for decision in decisions {
        match decision.overall_strategy {
            Strategy::Generic => summary.generic += 1,
            Strategy::License => summary.license += 1,
            Strategy::Wait => summary.wait += 1,
            Strategy::Drop => summary.drop += 1,
        }
    }
    summary
}

/// One row of the board-level patent-cliff timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingExpiry {
    pub molecule: String,
    pub country: String,
    pub expiry_date: NaiveDate,
    pub years_to_expiry: f64,
}

/// Flat projection of every still-blocking window, sorted ascending by
/// date. Already-clear countries contribute nothing.
pub fn upcoming_expiries(assessments: &[FtoAssessment]) -> Vec<UpcomingExpiry> {
    let mut rows: Vec<UpcomingExpiry> = assessments
        .iter()
        .flat_map(|a| a.by_country.iter())
        .filter(|c| c.status != FtoStatus::Clear)
        .map(|c| UpcomingExpiry {
            molecule: c.molecule.clone(),
            country: c.country.clone(),
            expiry_date: c.entry_date,
            years_to_expiry: c.years_display,
        })
        .collect();
    rows.sort_by(|a, b| {
        a.expiry_date
            .cmp(&b.expiry_date)
            .then_with(|| a.molecule.cmp(&b.molecule))
            .then_with(|| a.country.cmp(&b.country))
    });
    rows
}

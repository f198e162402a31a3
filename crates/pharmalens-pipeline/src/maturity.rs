//! Clinical/regulatory maturity scoring.
//!
//! Produces the 0–100 maturity score plus the risk flags feeding the
//! decision engine. Flags are appended independently; a molecule can carry
//! several at once. Trial outcomes are only ever read from verified data;
//! nothing here infers an outcome from a trial's lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use pharmalens_common::model::{
    ApprovalStatus, ClinicalTrialRecord, Molecule, RegulatoryStatusRecord, TrialOutcome,
    TrialPhase, TrialStatus,
};

use crate::weights;

/// Independent risk signals. Each carries enough context to render in a
/// report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "country")]
pub enum RiskFlag {
    TerminatedTrial,
    NegativeOutcome,
    MissingLocalTrials(String),
    NotFiled(String),
    NoPhase3Evidence,
}

impl fmt::Display for RiskFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskFlag::TerminatedTrial => write!(f, "at least one trial was terminated"),
            RiskFlag::NegativeOutcome => write!(f, "at least one trial read out negative"),
            RiskFlag::MissingLocalTrials(c) => {
                write!(f, "no local trial data in {c} without an approval there")
            }
            RiskFlag::NotFiled(c) => write!(f, "no regulatory filing in {c}"),
            RiskFlag::NoPhase3Evidence => write!(f, "no Phase III evidence"),
        }
    }
}

/// Per-country regulatory and trial presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryMaturity {
    pub country: String,
    pub has_local_trials: bool,
    pub regulatory_status: ApprovalStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityAssessment {
    pub molecule: String,
    pub highest_phase_completed: Option<TrialPhase>,
    pub has_phase3_data: bool,
    pub by_country: Vec<CountryMaturity>,
    pub risk_flags: Vec<RiskFlag>,
    /// Additive composite per the weights module, clamped to [0, 100].
    pub score: i32,
}

impl MaturityAssessment {
    pub fn regulatory_status_in(&self, country: &str) -> ApprovalStatus {
        self.by_country
            .iter()
            .find(|c| c.country.eq_ignore_ascii_case(country))
            .map(|c| c.regulatory_status)
            .unwrap_or(ApprovalStatus::NotFiled)
    }
}

/// Assess one molecule. `trials` and `regulatory` must already be
/// restricted to this molecule.
pub fn assess_maturity(
    molecule: &Molecule,
    trials: &[ClinicalTrialRecord],
    regulatory: &[RegulatoryStatusRecord],
    countries: &[String],
) -> MaturityAssessment {
    // Highest phase with at least one completed trial: scan IV → I.
    let highest_phase_completed = [
        TrialPhase::PhaseIV,
        TrialPhase::PhaseIII,
        TrialPhase::PhaseII,
        TrialPhase::PhaseI,
    ]
    .into_iter()
    .find(|phase| {
        trials
            .iter()
            .any(|t| t.phase == *phase && t.status == TrialStatus::Completed)
    });

    let has_phase3_data = trials.iter().any(|t| {
        matches!(t.phase, TrialPhase::PhaseIII | TrialPhase::PhaseIV)
            && (t.status == TrialStatus::Completed || t.outcome == Some(TrialOutcome::Positive))
    });

    let by_country: Vec<CountryMaturity> = countries
        .iter()
        .map(|country| {
            let has_local_trials = trials
                .iter()
                .any(|t| t.country.eq_ignore_ascii_case(country));
            let regulatory_status = regulatory
                .iter()
                .find(|r| r.country.eq_ignore_ascii_case(country))
                .map(|r| r.status)
                .unwrap_or(ApprovalStatus::NotFiled);
            CountryMaturity {
                country: country.clone(),
                has_local_trials,
                regulatory_status,
            }
        })
        .collect();

    let mut risk_flags = Vec::new();
    if trials.iter().any(|t| t.status == TrialStatus::Terminated) {
        risk_flags.push(RiskFlag::TerminatedTrial);
    }
    if trials
        .iter()
        .any(|t| t.outcome == Some(TrialOutcome::Negative))
    {
        risk_flags.push(RiskFlag::NegativeOutcome);
    }
    for entry in &by_country {
        if !entry.has_local_trials && entry.regulatory_status != ApprovalStatus::Approved {
            risk_flags.push(RiskFlag::MissingLocalTrials(entry.country.clone()));
        }
        if entry.regulatory_status == ApprovalStatus::NotFiled {
            risk_flags.push(RiskFlag::NotFiled(entry.country.clone()));
        }
    }
    if !has_phase3_data {
        risk_flags.push(RiskFlag::NoPhase3Evidence);
    }

    let approval_pts = (by_country
        .iter()
        .filter(|c| c.regulatory_status == ApprovalStatus::Approved)
        .count() as i32
        * weights::APPROVAL_PTS_PER_COUNTRY)
        .min(weights::APPROVAL_PTS_CAP);
    let local_trial_pts = (by_country.iter().filter(|c| c.has_local_trials).count() as i32
        * weights::LOCAL_TRIAL_PTS_PER_COUNTRY)
        .min(weights::LOCAL_TRIAL_PTS_CAP);
    let positive_pts = (trials
        .iter()
        .filter(|t| t.outcome == Some(TrialOutcome::Positive))
        .count() as i32
        * weights::POSITIVE_OUTCOME_PTS)
        .min(weights::POSITIVE_OUTCOME_PTS_CAP);
    let penalty = risk_flags.len() as i32 * weights::RISK_FLAG_PENALTY;

    let score = (weights::phase_points(highest_phase_completed)
        + approval_pts
        + local_trial_pts
        + positive_pts
        - penalty)
        .clamp(weights::SCORE_MIN, weights::SCORE_MAX);

    debug!(
        stage = "maturity",
        molecule = %molecule.name,
        score,
        flags = risk_flags.len(),
        "Maturity assessed"
    );

    MaturityAssessment {
        molecule: molecule.name.clone(),
        highest_phase_completed,
        has_phase3_data,
        by_country,
        risk_flags,
        score,
    }
}

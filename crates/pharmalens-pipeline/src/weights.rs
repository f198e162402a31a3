//! Maturity scoring policy as named constants.
//!
//! The 0–100 maturity score is an additive, clamped composite. These weights
//! are a fixed, documented policy, not learned and not tuned at runtime. They
//! live here so the policy is auditable and testable in one place.

use pharmalens_common::model::TrialPhase;

/// Contribution of the highest *completed* trial phase.
pub const PHASE_I_PTS: i32 = 10;
pub const PHASE_II_PTS: i32 = 20;
pub const PHASE_III_PTS: i32 = 35;
pub const PHASE_IV_PTS: i32 = 40;

/// Per-country regulatory approval, capped across countries.
pub const APPROVAL_PTS_PER_COUNTRY: i32 = 15;
pub const APPROVAL_PTS_CAP: i32 = 30;

/// Per-country local-trial presence, capped across countries.
pub const LOCAL_TRIAL_PTS_PER_COUNTRY: i32 = 10;
pub const LOCAL_TRIAL_PTS_CAP: i32 = 20;

/// Per verified positive-outcome trial, capped.
pub const POSITIVE_OUTCOME_PTS: i32 = 3;
pub const POSITIVE_OUTCOME_PTS_CAP: i32 = 10;

/// Deduction per risk flag.
pub const RISK_FLAG_PENALTY: i32 = 5;

pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

pub fn phase_points(phase: Option<TrialPhase>) -> i32 {
    match phase {
        None => 0,
        Some(TrialPhase::PhaseI) => PHASE_I_PTS,
        Some(TrialPhase::PhaseII) => PHASE_II_PTS,
        Some(TrialPhase::PhaseIII) => PHASE_III_PTS,
        Some(TrialPhase::PhaseIV) => PHASE_IV_PTS,
    }
}

//! Reference data model: molecules, patents, trials, regulatory filings,
//! and disease-market sizing.
//!
//! All of these are immutable reference records loaded once per pipeline
//! invocation. Denormalized fields (patent lifecycle status, market size)
//! are *derived* here as pure functions of the primitive fields rather than
//! trusted from storage, so a stale stored flag can never leak into a
//! decision.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Molecule
// =============================================================================

/// Drug modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    SmallMolecule,
    Antibody,
    Peptide,
    Biologic,
}

impl Modality {
    /// Antibodies and other biologics carry the manufacturing and
    /// registration barriers that matter for specialty-category gating.
    pub fn is_biologic(&self) -> bool {
        matches!(self, Modality::Antibody | Modality::Biologic)
    }
}

/// Molecule identity record. `name` is the unique join key across the
/// whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    pub id: Uuid,
    pub name: String,
    pub generic_name: Option<String>,
    pub brand_name: Option<String>,
    pub indication: String,
    pub modality: Modality,
    pub innovator: String,
}

impl Molecule {
    pub fn new(name: impl Into<String>, indication: impl Into<String>, modality: Modality) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            generic_name: None,
            brand_name: None,
            indication: indication.into(),
            modality,
            innovator: String::new(),
        }
    }

    /// Case-insensitive match against name, brand name, or generic name.
    pub fn matches_name(&self, query: &str) -> bool {
        let q = query.trim();
        self.name.eq_ignore_ascii_case(q)
            || self.brand_name.as_deref().is_some_and(|b| b.eq_ignore_ascii_case(q))
            || self.generic_name.as_deref().is_some_and(|g| g.eq_ignore_ascii_case(q))
    }
}

// =============================================================================
// Patent
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatentType {
    Compound,
    Formulation,
    Process,
    Secondary,
    Device,
}

impl PatentType {
    /// Compound/substance patents are the core barrier; everything else is
    /// a narrower, more easily designed-around right.
    pub fn is_primary(&self) -> bool {
        matches!(self, PatentType::Compound)
    }
}

/// Derived patent lifecycle status, recomputed against the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatentStatus {
    Active,
    Expired,
}

/// Patent grant, scoped to exactly one molecule and one country.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatentRecord {
    pub id: Uuid,
    pub molecule: String,
    pub country: String,
    pub patent_number: String,
    pub patent_type: PatentType,
    pub filing_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl PatentRecord {
    /// Lifecycle status as of `asof`. Always recomputed from `expiry_date`;
    /// any stored Active/Expired flag is ignored.
    pub fn status(&self, asof: NaiveDate) -> PatentStatus {
        if self.expiry_date <= asof {
            PatentStatus::Expired
        } else {
            PatentStatus::Active
        }
    }

    pub fn is_active(&self, asof: NaiveDate) -> bool {
        self.status(asof) == PatentStatus::Active
    }
}

// =============================================================================
// Clinical trials
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrialPhase {
    #[serde(rename = "Phase I")]
    PhaseI,
    #[serde(rename = "Phase II")]
    PhaseII,
    #[serde(rename = "Phase III")]
    PhaseIII,
    #[serde(rename = "Phase IV")]
    PhaseIV,
}

impl TrialPhase {
    pub fn label(&self) -> &'static str {
        match self {
            TrialPhase::PhaseI => "Phase I",
            TrialPhase::PhaseII => "Phase II",
            TrialPhase::PhaseIII => "Phase III",
            TrialPhase::PhaseIV => "Phase IV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Recruiting,
    Completed,
    Terminated,
}

/// Trial outcome. Only present when independently verified; never inferred
/// from trial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialOutcome {
    Positive,
    Negative,
    Ongoing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicalTrialRecord {
    pub id: Uuid,
    pub molecule: String,
    pub phase: TrialPhase,
    pub status: TrialStatus,
    pub country: String,
    pub sponsor: String,
    pub outcome: Option<TrialOutcome>,
    pub completion_date: Option<NaiveDate>,
}

// =============================================================================
// Regulatory status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    NotFiled,
    UnderReview,
    Approved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalTrack {
    FullApplication,
    BiologicLicense,
    Generic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryStatusRecord {
    pub id: Uuid,
    pub molecule: String,
    pub country: String,
    pub status: ApprovalStatus,
    pub approval_date: Option<NaiveDate>,
    pub track: Option<ApprovalTrack>,
}

// =============================================================================
// Disease market
// =============================================================================

/// Market sizing for one (disease, country, year) triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseMarketRecord {
    pub id: Uuid,
    pub disease: String,
    pub country: String,
    pub year: i32,
    /// Population living with the condition.
    pub prevalence: u64,
    /// Percentage of prevalent patients actually on therapy (0–100).
    pub treated_rate_pct: f64,
    /// Average annual therapy cost per treated patient, USD.
    pub avg_annual_cost: f64,
    /// Optional stored market size. `effective_market_size` recomputes the
    /// value and treats a divergent stored figure as an override to report.
    pub market_size_usd: Option<f64>,
}

impl DiseaseMarketRecord {
    /// Market size from primitive fields:
    /// prevalence × (treated_rate / 100) × avg_cost.
    pub fn derived_market_size(&self) -> f64 {
        self.prevalence as f64 * (self.treated_rate_pct / 100.0) * self.avg_annual_cost
    }

    /// The market size the pipeline uses, plus whether a stored value
    /// diverged from the derived one (caller logs the divergence).
    pub fn effective_market_size(&self) -> (f64, bool) {
        let derived = self.derived_market_size();
        match self.market_size_usd {
            Some(stored) if (stored - derived).abs() > 1.0 => (derived, true),
            _ => (derived, false),
        }
    }
}

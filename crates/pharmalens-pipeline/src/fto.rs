//! Freedom-to-operate analysis.
//!
//! Per (molecule, country): partition patents into expired and active
//! against the evaluation date, then classify the window. The binding
//! constraint is the **latest-expiring active patent**: a molecule stays
//! blocked until its longest-surviving right lapses, no matter how many
//! shorter rights expired first. Using the earliest expiry here would
//! overstate freedom to operate.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pharmalens_common::model::{Molecule, PatentRecord};

/// Years-to-clear classification thresholds.
pub const EXPIRING_SOON_MAX_YEARS: f64 = 2.0;

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FtoStatus {
    Clear,
    ExpiringSoon,
    Blocked,
}

impl FtoStatus {
    /// Severity rank for worst-of rollups (Blocked > ExpiringSoon > Clear).
    pub fn severity(&self) -> u8 {
        match self {
            FtoStatus::Clear => 0,
            FtoStatus::ExpiringSoon => 1,
            FtoStatus::Blocked => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FtoStatus::Clear => "CLEAR",
            FtoStatus::ExpiringSoon => "EXPIRING_SOON",
            FtoStatus::Blocked => "BLOCKED",
        }
    }
}

/// Patent-cliff horizon buckets. A reporting view over the same
/// years-to-clear value, not a separate rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CliffHorizon {
    Cleared,
    WithinOneYear,
    WithinThreeYears,
    WithinFiveYears,
    BeyondFiveYears,
}

impl CliffHorizon {
    pub fn from_years(years: f64) -> Self {
        if years <= 0.0 {
            CliffHorizon::Cleared
        } else if years <= 1.0 {
            CliffHorizon::WithinOneYear
        } else if years <= 3.0 {
            CliffHorizon::WithinThreeYears
        } else if years <= 5.0 {
            CliffHorizon::WithinFiveYears
        } else {
            CliffHorizon::BeyondFiveYears
        }
    }
}

/// FTO outcome for one (molecule, country) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryFtoResult {
    pub molecule: String,
    pub country: String,
    pub status: FtoStatus,
    /// Date the market opens: latest active expiry, or `asof` when already
    /// clear.
    pub entry_date: NaiveDate,
    /// Raw years to clear; classification uses this value.
    pub years_to_clear: f64,
    /// One-decimal figure for rationale and report text.
    pub years_display: f64,
    /// Patent numbers still blocking entry.
    pub blocking_patents: Vec<String>,
    /// Patent numbers already expired.
    pub expired_patents: Vec<String>,
    /// Whether the binding (latest-expiring) patent is a primary/compound
    /// patent. None when nothing blocks.
    pub blocking_is_primary: Option<bool>,
    pub cliff_horizon: CliffHorizon,
    pub rationale: String,
}

/// Molecule-level rollup across target countries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FtoAssessment {
    pub molecule: String,
    pub by_country: Vec<CountryFtoResult>,
    /// Worst status across countries.
    pub overall: FtoStatus,
    /// A primary (compound) patent existed and every one of them has
    /// expired.
    pub primary_expired: bool,
    /// Some country is blocked, and in no blocked country is the blocker a
    /// primary patent. A design-around signal.
    pub secondary_only_blocking: bool,
}

/// Classify a years-to-clear value. Boundary inclusivity: exactly 0 is
/// CLEAR, exactly 2.0 is EXPIRING_SOON, anything above 2.0 is BLOCKED.
pub fn classify_years(years: f64) -> FtoStatus {
    if years <= 0.0 {
        // Defensive: active patents always yield a positive window.
        FtoStatus::Clear
    } else if years <= EXPIRING_SOON_MAX_YEARS {
        FtoStatus::ExpiringSoon
    } else {
        FtoStatus::Blocked
    }
}

pub fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    to.signed_duration_since(from).num_days() as f64 / DAYS_PER_YEAR
}

fn round_one_decimal(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Analyze one country. `patents` must already be restricted to this
/// molecule and country; lifecycle status is recomputed from expiry dates,
/// never read from storage.
pub fn analyze_country(
    molecule: &str,
    country: &str,
    patents: &[&PatentRecord],
    asof: NaiveDate,
) -> CountryFtoResult {
    let (active, expired): (Vec<&PatentRecord>, Vec<&PatentRecord>) =
        patents.iter().copied().partition(|p| p.is_active(asof));

    let expired_patents: Vec<String> =
        expired.iter().map(|p| p.patent_number.clone()).collect();

    if active.is_empty() {
        let rationale = if patents.is_empty() {
            format!(
                "No patent filings found for {molecule} in {country}; \
                 freedom to operate from {asof}."
            )
        } else {
            format!(
                "All {} patent(s) for {molecule} in {country} have expired; \
                 freedom to operate from {asof}.",
                patents.len()
            )
        };
        return CountryFtoResult {
            molecule: molecule.to_string(),
            country: country.to_string(),
            status: FtoStatus::Clear,
            entry_date: asof,
            years_to_clear: 0.0,
            years_display: 0.0,
            blocking_patents: Vec::new(),
            expired_patents,
            blocking_is_primary: None,
            cliff_horizon: CliffHorizon::Cleared,
            rationale,
        };
    }

    // The binding constraint: the latest-expiring active patent.
    let binding = active
        .iter()
        .max_by_key(|p| p.expiry_date)
        .copied()
        .unwrap_or(active[0]);
    let years = years_between(asof, binding.expiry_date);
    let years_display = round_one_decimal(years);
    let status = classify_years(years);

    let blocker_kind = if binding.patent_type.is_primary() {
        "a primary (compound) patent"
    } else {
        "a secondary (formulation/process) patent, typically easier to design around"
    };
    let rationale = format!(
        "{total} patent(s) on file for {molecule} in {country}, {gone} already expired. \
         Market entry is blocked until {date} by {number}, {kind} — roughly \
         {years_display:.1} years out.",
        total = patents.len(),
        gone = expired.len(),
        date = binding.expiry_date,
        number = binding.patent_number,
        kind = blocker_kind,
    );

    debug!(
        stage = "fto",
        molecule,
        country,
        status = status.label(),
        years = years_display,
        "Country FTO computed"
    );

    CountryFtoResult {
        molecule: molecule.to_string(),
        country: country.to_string(),
        status,
        entry_date: binding.expiry_date,
        years_to_clear: years,
        years_display,
        blocking_patents: active.iter().map(|p| p.patent_number.clone()).collect(),
        expired_patents,
        blocking_is_primary: Some(binding.patent_type.is_primary()),
        cliff_horizon: CliffHorizon::from_years(years),
        rationale,
    }
}

/// Full molecule assessment across the target countries.
/// Zero patents anywhere is the maximally favorable case, not an error.
pub fn analyze_molecule(
    molecule: &Molecule,
    patents: &[PatentRecord],
    countries: &[String],
    asof: NaiveDate,
) -> FtoAssessment {
    let own: Vec<&PatentRecord> = patents
        .iter()
        .filter(|p| p.molecule.eq_ignore_ascii_case(&molecule.name))
        .collect();

    let by_country: Vec<CountryFtoResult> = countries
        .iter()
        .map(|country| {
            let in_country: Vec<&PatentRecord> = own
                .iter()
                .filter(|p| p.country.eq_ignore_ascii_case(country))
                .copied()
                .collect();
            analyze_country(&molecule.name, country, &in_country, asof)
        })
        .collect();

    let overall = by_country
        .iter()
        .map(|c| c.status)
        .max_by_key(|s| s.severity())
        .unwrap_or(FtoStatus::Clear);

    let primaries: Vec<&&PatentRecord> =
        own.iter().filter(|p| p.patent_type.is_primary()).collect();
    let primary_expired =
        !primaries.is_empty() && primaries.iter().all(|p| !p.is_active(asof));

    let blocked_countries: Vec<&CountryFtoResult> = by_country
        .iter()
        .filter(|c| c.status != FtoStatus::Clear)
        .collect();
    let secondary_only_blocking = !blocked_countries.is_empty()
        && blocked_countries
            .iter()
            .all(|c| c.blocking_is_primary == Some(false));

    FtoAssessment {
        molecule: molecule.name.clone(),
        by_country,
        overall,
        primary_expired,
        secondary_only_blocking,
    }
}

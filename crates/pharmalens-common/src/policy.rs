//! Decision policy configuration.
//!
//! Everything tunable about the commercial pipeline lives here: target
//! countries, new-entrant market-share assumptions, specialty categories,
//! and the indication/country synonym tables used by scope resolution.
//! Deployments override these via TOML; the defaults document the reference
//! policy.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{PharmalensError, Result};

/// Complete pipeline policy. All sections default independently so a TOML
/// file only needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Countries every stage evaluates, in report order.
    #[serde(default = "default_target_countries")]
    pub target_countries: Vec<String>,

    /// Market assumptions
    #[serde(default)]
    pub market: MarketPolicy,

    /// Specialty-category gating
    #[serde(default)]
    pub specialty: SpecialtyPolicy,

    /// Scope-resolution synonym tables
    #[serde(default)]
    pub synonyms: SynonymPolicy,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            target_countries: default_target_countries(),
            market: MarketPolicy::default(),
            specialty: SpecialtyPolicy::default(),
            synonyms: SynonymPolicy::default(),
        }
    }
}

impl DecisionPolicy {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| PharmalensError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| PharmalensError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&raw)
    }
}

fn default_target_countries() -> Vec<String> {
    vec!["US".to_string(), "IN".to_string()]
}

// ── Market assumptions ───────────────────────────────────────────────────────

/// New-entrant capturable-share assumptions per country. These are policy
/// constants, not forecasts: a conservative single-digit share, lower in the
/// more competitive and mature market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPolicy {
    /// Country code → fraction of addressable market a new entrant captures.
    #[serde(default = "default_entrant_share")]
    pub entrant_share: HashMap<String, f64>,

    /// Share applied to countries missing from `entrant_share`.
    #[serde(default = "default_fallback_share")]
    pub fallback_share: f64,
}

impl Default for MarketPolicy {
    fn default() -> Self {
        Self {
            entrant_share: default_entrant_share(),
            fallback_share: default_fallback_share(),
        }
    }
}

impl MarketPolicy {
    pub fn share_for(&self, country: &str) -> f64 {
        self.entrant_share
            .get(country)
            .copied()
            .unwrap_or(self.fallback_share)
    }
}

fn default_entrant_share() -> HashMap<String, f64> {
    HashMap::from([
        ("US".to_string(), 0.03),
        ("IN".to_string(), 0.08),
    ])
}

fn default_fallback_share() -> f64 {
    0.05
}

// ── Specialty gating ─────────────────────────────────────────────────────────

/// High-complexity category gating for decision row 1. A molecule is
/// "specialty" when its canonical indication is listed here *and* its
/// modality is a biologic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialtyPolicy {
    #[serde(default = "default_specialty_indications")]
    pub indications: Vec<String>,
}

impl Default for SpecialtyPolicy {
    fn default() -> Self {
        Self {
            indications: default_specialty_indications(),
        }
    }
}

impl SpecialtyPolicy {
    pub fn covers(&self, canonical_indication: &str) -> bool {
        self.indications
            .iter()
            .any(|i| i.eq_ignore_ascii_case(canonical_indication))
    }
}

fn default_specialty_indications() -> Vec<String> {
    vec!["oncology".to_string()]
}

// ── Synonym tables ───────────────────────────────────────────────────────────

/// Alias tables for scope resolution: free-text indication and country
/// spellings mapped to their canonical forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymPolicy {
    #[serde(default = "default_indication_synonyms")]
    pub indications: HashMap<String, String>,

    #[serde(default = "default_country_synonyms")]
    pub countries: HashMap<String, String>,
}

impl Default for SynonymPolicy {
    fn default() -> Self {
        Self {
            indications: default_indication_synonyms(),
            countries: default_country_synonyms(),
        }
    }
}

impl SynonymPolicy {
    /// Canonical indication for a free-text phrase. Unknown phrases pass
    /// through lowercased; matching against molecules happens downstream.
    pub fn canonical_indication(&self, raw: &str) -> String {
        let key = raw.trim().to_lowercase();
        self.indications.get(&key).cloned().unwrap_or(key)
    }

    /// Canonical country code for a free-text phrase. Unknown phrases pass
    /// through uppercased.
    pub fn canonical_country(&self, raw: &str) -> String {
        let key = raw.trim().to_lowercase();
        self.countries
            .get(&key)
            .cloned()
            .unwrap_or_else(|| raw.trim().to_uppercase())
    }
}

fn default_indication_synonyms() -> HashMap<String, String> {
    let pairs = [
        ("oncology", "oncology"),
        ("cancer", "oncology"),
        ("lung cancer", "oncology"),
        ("nsclc", "oncology"),
        ("breast cancer", "oncology"),
        ("diabetes", "type 2 diabetes"),
        ("t2d", "type 2 diabetes"),
        ("type 2 diabetes", "type 2 diabetes"),
        ("obesity", "obesity"),
        ("weight loss", "obesity"),
        ("cardiology", "cardiovascular"),
        ("heart disease", "cardiovascular"),
        ("cardiovascular", "cardiovascular"),
        ("immunology", "immunology"),
        ("rheumatoid arthritis", "immunology"),
        ("psoriasis", "immunology"),
    ];
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn default_country_synonyms() -> HashMap<String, String> {
    let pairs = [
        ("us", "US"),
        ("usa", "US"),
        ("united states", "US"),
        ("america", "US"),
        ("in", "IN"),
        ("india", "IN"),
    ];
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

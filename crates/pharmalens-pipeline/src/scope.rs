//! Scope resolution — maps a structured query filter to a concrete molecule set.
//!
//! Precedence: an explicit molecule name beats an indication filter; an
//! indication with zero matches resolves to a deliberately empty set (never
//! a silent fall-back to all molecules); an empty filter means everything.

use serde::{Deserialize, Serialize};
use tracing::debug;

use pharmalens_common::model::Molecule;
use pharmalens_common::policy::DecisionPolicy;

/// Structured filter produced by the query-parsing collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryFilter {
    pub indication: Option<String>,
    pub country: Option<String>,
    pub molecule_name: Option<String>,
}

/// Resolved scope plus the normalized criteria later stages reuse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeResolution {
    pub molecules: Vec<Molecule>,
    pub canonical_indication: Option<String>,
    pub canonical_country: Option<String>,
}

impl ScopeResolution {
    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }
}

pub fn resolve_scope(
    molecules: &[Molecule],
    filter: &QueryFilter,
    policy: &DecisionPolicy,
) -> ScopeResolution {
    let canonical_indication = filter
        .indication
        .as_deref()
        .map(|i| policy.synonyms.canonical_indication(i));
    let canonical_country = filter
        .country
        .as_deref()
        .map(|c| policy.synonyms.canonical_country(c));

    // Molecule name wins over any indication filter.
    if let Some(name) = filter.molecule_name.as_deref() {
        let matched = find_molecule(molecules, name);
        debug!(
            stage = "scope",
            query = name,
            matched = matched.is_some(),
            "Molecule-name resolution"
        );
        return ScopeResolution {
            molecules: matched.into_iter().collect(),
            canonical_indication,
            canonical_country,
        };
    }

    let selected: Vec<Molecule> = match canonical_indication.as_deref() {
        Some(indication) => molecules
            .iter()
            .filter(|m| policy.synonyms.canonical_indication(&m.indication) == indication)
            .cloned()
            .collect(),
        None => molecules.to_vec(),
    };

    debug!(
        stage = "scope",
        indication = canonical_indication.as_deref().unwrap_or("*"),
        matched = selected.len(),
        "Indication resolution"
    );

    ScopeResolution {
        molecules: selected,
        canonical_indication,
        canonical_country,
    }
}

/// Exact case-insensitive match on name/brand/generic first, then substring.
/// First hit in stable molecule order wins.
fn find_molecule(molecules: &[Molecule], query: &str) -> Option<Molecule> {
    if let Some(m) = molecules.iter().find(|m| m.matches_name(query)) {
        return Some(m.clone());
    }
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    molecules
        .iter()
        .find(|m| {
            let name = m.name.to_lowercase();
            name.contains(&needle) || needle.contains(&name)
        })
        .cloned()
}

//! Addressable-market estimation.
//!
//! Reads (or re-derives) the disease-market size per country, applies the
//! policy's conservative new-entrant share assumption, and buckets each
//! country into an attractiveness tier. Molecules with no market data are
//! still returned, at zero size and LOW tier.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pharmalens_common::model::{DiseaseMarketRecord, Molecule};
use pharmalens_common::policy::DecisionPolicy;

/// Attractiveness tier thresholds on absolute market size.
pub const TIER_HIGH_MIN_USD: f64 = 5_000_000_000.0;
pub const TIER_MEDIUM_MIN_USD: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketTier {
    High,
    Medium,
    Low,
}

impl MarketTier {
    pub fn from_market_size(size_usd: f64) -> Self {
        if size_usd >= TIER_HIGH_MIN_USD {
            MarketTier::High
        } else if size_usd >= TIER_MEDIUM_MIN_USD {
            MarketTier::Medium
        } else {
            MarketTier::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryMarket {
    pub country: String,
    pub market_size_usd: f64,
    /// size × policy entrant share for this country.
    pub est_revenue_usd: f64,
    pub tier: MarketTier,
    /// Year of the sizing record used; None when no record existed.
    pub source_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketAssessment {
    pub molecule: String,
    pub indication: String,
    pub by_country: Vec<CountryMarket>,
    pub total_market_usd: f64,
    pub total_est_revenue_usd: f64,
}

impl MarketAssessment {
    pub fn country(&self, country: &str) -> Option<&CountryMarket> {
        self.by_country
            .iter()
            .find(|c| c.country.eq_ignore_ascii_case(country))
    }
}

/// Assess one molecule's market. `markets` is the full disease-market table;
/// records are matched on canonical indication. When several years exist for
/// a (disease, country) pair the most recent wins.
pub fn assess_market(
    molecule: &Molecule,
    markets: &[DiseaseMarketRecord],
    countries: &[String],
    policy: &DecisionPolicy,
) -> MarketAssessment {
    let indication = policy.synonyms.canonical_indication(&molecule.indication);

    let by_country: Vec<CountryMarket> = countries
        .iter()
        .map(|country| {
            let record = markets
                .iter()
                .filter(|m| {
                    m.country.eq_ignore_ascii_case(country)
                        && policy.synonyms.canonical_indication(&m.disease) == indication
                })
                .max_by_key(|m| m.year);

            match record {
                Some(rec) => {
                    let (size, diverged) = rec.effective_market_size();
                    if diverged {
                        warn!(
                            stage = "market",
                            molecule = %molecule.name,
                            country = %country,
                            stored = rec.market_size_usd,
                            derived = size,
                            "Stored market size diverges from derived value; using derived"
                        );
                    }
                    let share = policy.market.share_for(country);
                    CountryMarket {
                        country: country.clone(),
                        market_size_usd: size,
                        est_revenue_usd: size * share,
                        tier: MarketTier::from_market_size(size),
                        source_year: Some(rec.year),
                    }
                }
                None => CountryMarket {
                    country: country.clone(),
                    market_size_usd: 0.0,
                    est_revenue_usd: 0.0,
                    tier: MarketTier::Low,
                    source_year: None,
                },
            }
        })
        .collect();

    let total_market_usd = by_country.iter().map(|c| c.market_size_usd).sum();
    let total_est_revenue_usd = by_country.iter().map(|c| c.est_revenue_usd).sum();

    debug!(
        stage = "market",
        molecule = %molecule.name,
        indication = %indication,
        total_market_usd,
        "Market assessed"
    );

    MarketAssessment {
        molecule: molecule.name.clone(),
        indication,
        by_country,
        total_market_usd,
        total_est_revenue_usd,
    }
}

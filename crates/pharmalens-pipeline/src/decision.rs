//! Decision engine — joins FTO, maturity, and market signals into a
//! per-country recommendation, a molecule-level rollup, and a globally
//! ranked list.
//!
//! Branch selection is rule-table dispatch: an ordered slice of named rules
//! evaluated top to bottom, first match wins. The precedence is data, so
//! each row is unit-testable on its own and no two rows can fire for one
//! input.

use serde::{Deserialize, Serialize};

use pharmalens_common::model::{ApprovalStatus, Molecule};
use pharmalens_common::policy::DecisionPolicy;

use crate::fto::{CountryFtoResult, FtoAssessment, FtoStatus, EXPIRING_SOON_MAX_YEARS};
use crate::market::{CountryMarket, MarketAssessment};
use crate::maturity::MaturityAssessment;

/// Specialty categories with exclusivity beyond this many years are an
/// immediate drop (row 1).
pub const SPECIALTY_DROP_MIN_YEARS: f64 = 3.0;
/// Upper bound of the wait-and-re-evaluate window (row 4).
pub const WAIT_MAX_YEARS: f64 = 4.0;
/// Licensing is only worth negotiating above this total market (row 5).
pub const LICENSE_MIN_TOTAL_MARKET_USD: f64 = 5_000_000_000.0;
/// ...and above this maturity score (row 5).
pub const LICENSE_MIN_MATURITY_SCORE: i32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
    Generic,
    License,
    Wait,
    Drop,
}

impl Strategy {
    /// Rollup/ranking priority: lower is better.
    pub fn priority(&self) -> u8 {
        match self {
            Strategy::Generic => 0,
            Strategy::License => 1,
            Strategy::Wait => 2,
            Strategy::Drop => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Generic => "GENERIC",
            Strategy::License => "LICENSE",
            Strategy::Wait => "WAIT",
            Strategy::Drop => "DROP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

impl RiskRating {
    pub fn severity(&self) -> u8 {
        match self {
            RiskRating::Low => 0,
            RiskRating::Medium => 1,
            RiskRating::High => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Gate {
    Go,
    NoGo,
    Conditional,
}

/// One country's recommendation with its audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct CountryCall {
    pub country: String,
    pub strategy: Strategy,
    pub risk: RiskRating,
    pub gate: Gate,
    /// Which decision-table row fired.
    pub rule: &'static str,
    /// Plain-language rationale naming the numbers that drove the branch.
    pub rationale: String,
    /// Unmet conditions; non-empty exactly when `gate` is Conditional.
    pub conditions: Vec<String>,
}

/// Final molecule decision after rollup.
#[derive(Debug, Clone, Serialize)]
pub struct MoleculeDecision {
    pub molecule: String,
    pub indication: String,
    pub innovator: String,
    pub by_country: Vec<CountryCall>,
    /// Best country outcome (GENERIC > LICENSE > WAIT > DROP).
    pub overall_strategy: Strategy,
    /// Worst risk across countries.
    pub overall_risk: RiskRating,
    /// Dense 1-based rank assigned after global sorting.
    pub priority_rank: usize,
    pub maturity_score: i32,
    pub total_market_usd: f64,
    pub total_est_revenue_usd: f64,
}

/// Everything a decision-table row may consult.
pub struct RuleContext<'a> {
    pub molecule: &'a Molecule,
    pub country: &'a str,
    pub fto: &'a CountryFtoResult,
    pub maturity: &'a MaturityAssessment,
    pub market: &'a MarketAssessment,
    pub country_market: Option<&'a CountryMarket>,
    /// Policy-specialty indication combined with a biologic modality.
    pub is_specialty: bool,
    pub approved_in_country: bool,
}

impl RuleContext<'_> {
    fn years(&self) -> f64 {
        self.fto.years_to_clear
    }

    fn market_size(&self) -> f64 {
        self.country_market.map(|m| m.market_size_usd).unwrap_or(0.0)
    }
}

pub struct DecisionRule {
    pub name: &'static str,
    pub applies: fn(&RuleContext) -> bool,
    pub build: fn(&RuleContext) -> CountryCall,
}

/// The decision table, in precedence order. First matching row wins; the
/// final row is unconditional, so evaluation is total.
pub const DECISION_TABLE: &[DecisionRule] = &[
    DecisionRule {
        name: "specialty-long-exclusivity",
        applies: |ctx| ctx.is_specialty && ctx.years() > SPECIALTY_DROP_MIN_YEARS,
        build: |ctx| CountryCall {
            country: ctx.country.to_string(),
            strategy: Strategy::Drop,
            risk: RiskRating::High,
            gate: Gate::NoGo,
            rule: "specialty-long-exclusivity",
            rationale: format!(
                "{} is a specialty {} product with exclusivity until {} \
                 ({:.1} years). Manufacturing and registration barriers make \
                 early entry economically irrational regardless of the \
                 ${:.1}B market.",
                ctx.molecule.name,
                ctx.market.indication,
                ctx.fto.entry_date,
                ctx.fto.years_display,
                ctx.market_size() / 1e9,
            ),
            conditions: Vec::new(),
        },
    },
    DecisionRule {
        name: "clear-entry",
        applies: |ctx| ctx.fto.status == FtoStatus::Clear,
        build: |ctx| {
            let (gate, risk, conditions) = if ctx.approved_in_country {
                (Gate::Go, RiskRating::Low, Vec::new())
            } else {
                (
                    Gate::Conditional,
                    RiskRating::Medium,
                    vec![format!(
                        "File a generic regulatory application in {}",
                        ctx.country
                    )],
                )
            };
            CountryCall {
                country: ctx.country.to_string(),
                strategy: Strategy::Generic,
                risk,
                gate,
                rule: "clear-entry",
                rationale: format!(
                    "No active patents block {} in {} as of {}. Addressable \
                     market ${:.1}B, maturity score {}. {}",
                    ctx.molecule.name,
                    ctx.country,
                    ctx.fto.entry_date,
                    ctx.market_size() / 1e9,
                    ctx.maturity.score,
                    if ctx.approved_in_country {
                        "Already approved in-country; immediate generic entry."
                    } else {
                        "A regulatory filing is still required before launch."
                    },
                ),
                conditions,
            }
        },
    },
    DecisionRule {
        name: "expiring-soon-generic",
        applies: |ctx| ctx.fto.status == FtoStatus::ExpiringSoon,
        build: |ctx| CountryCall {
            country: ctx.country.to_string(),
            strategy: Strategy::Generic,
            risk: RiskRating::Medium,
            gate: Gate::Conditional,
            rule: "expiring-soon-generic",
            rationale: format!(
                "The blocking patent on {} in {} expires {} — {:.1} years \
                 out. Begin filing preparation now so entry is immediate on \
                 expiry into a ${:.1}B market. {}",
                ctx.molecule.name,
                ctx.country,
                ctx.fto.entry_date,
                ctx.fto.years_display,
                ctx.market_size() / 1e9,
                if ctx.fto.blocking_is_primary == Some(false) {
                    "Only a secondary patent remains, a weaker barrier with \
                     design-around potential."
                } else {
                    ""
                },
            )
            .trim_end()
            .to_string(),
            conditions: vec![
                "Begin generic filing preparation now".to_string(),
                format!("Enter on patent expiry ({})", ctx.fto.entry_date),
            ],
        },
    },
    DecisionRule {
        name: "wait-window",
        applies: |ctx| ctx.years() > EXPIRING_SOON_MAX_YEARS && ctx.years() <= WAIT_MAX_YEARS,
        build: |ctx| CountryCall {
            country: ctx.country.to_string(),
            strategy: Strategy::Wait,
            risk: RiskRating::Medium,
            gate: Gate::Conditional,
            rule: "wait-window",
            rationale: format!(
                "{} stays blocked in {} until {} ({:.1} years). Too early to \
                 file; hold and re-enter the analysis once inside the 2-year \
                 window.",
                ctx.molecule.name, ctx.country, ctx.fto.entry_date, ctx.fto.years_display,
            ),
            conditions: vec![format!(
                "Re-evaluate once within 2 years of the {} expiry",
                ctx.fto.entry_date
            )],
        },
    },
    DecisionRule {
        name: "license-big-prize",
        applies: |ctx| {
            ctx.years() > WAIT_MAX_YEARS
                && ctx.market.total_market_usd >= LICENSE_MIN_TOTAL_MARKET_USD
                && ctx.maturity.score >= LICENSE_MIN_MATURITY_SCORE
        },
        build: |ctx| CountryCall {
            country: ctx.country.to_string(),
            strategy: Strategy::License,
            risk: RiskRating::High,
            gate: Gate::Conditional,
            rule: "license-big-prize",
            rationale: format!(
                "{} is blocked in {} until {} ({:.1} years), but a \
                 ${:.1}B total market and maturity score {} justify \
                 negotiating rights from {} despite the long exclusivity.",
                ctx.molecule.name,
                ctx.country,
                ctx.fto.entry_date,
                ctx.fto.years_display,
                ctx.market.total_market_usd / 1e9,
                ctx.maturity.score,
                ctx.molecule.innovator,
            ),
            conditions: vec![format!(
                "Negotiate a license with {}",
                ctx.molecule.innovator
            )],
        },
    },
    DecisionRule {
        name: "default-drop",
        applies: |_ctx| true,
        build: |ctx| CountryCall {
            country: ctx.country.to_string(),
            strategy: Strategy::Drop,
            risk: RiskRating::High,
            gate: Gate::NoGo,
            rule: "default-drop",
            rationale: format!(
                "{} in {}: blocked until {} ({:.1} years) with a ${:.1}B \
                 market and maturity score {} — not enough upside for a \
                 license and too far out to wait.",
                ctx.molecule.name,
                ctx.country,
                ctx.fto.entry_date,
                ctx.fto.years_display,
                ctx.market.total_market_usd / 1e9,
                ctx.maturity.score,
            ),
            conditions: Vec::new(),
        },
    },
];

/// Evaluate the decision table for one (molecule, country).
pub fn decide_country(ctx: &RuleContext) -> CountryCall {
    for rule in DECISION_TABLE {
        if (rule.applies)(ctx) {
            return (rule.build)(ctx);
        }
    }
    unreachable!("decision table ends with an unconditional row")
}

/// Per-country evaluation plus rollup for one molecule. Rank is assigned
/// later by [`rank_decisions`].
pub fn decide_molecule(
    molecule: &Molecule,
    fto: &FtoAssessment,
    maturity: &MaturityAssessment,
    market: &MarketAssessment,
    policy: &DecisionPolicy,
) -> MoleculeDecision {
    let is_specialty = policy.specialty.covers(&market.indication)
        && molecule.modality.is_biologic();

    let by_country: Vec<CountryCall> = fto
        .by_country
        .iter()
        .map(|country_fto| {
            let ctx = RuleContext {
                molecule,
                country: &country_fto.country,
                fto: country_fto,
                maturity,
                market,
                country_market: market.country(&country_fto.country),
                is_specialty,
                approved_in_country: maturity.regulatory_status_in(&country_fto.country)
                    == ApprovalStatus::Approved,
            };
            decide_country(&ctx)
        })
        .collect();

    // Optimistic strategy rollup, pessimistic risk rollup: the headline
    // surfaces the best opportunity while the risk never understates
    // exposure.
    let overall_strategy = by_country
        .iter()
        .map(|c| c.strategy)
        .min_by_key(|s| s.priority())
        .unwrap_or(Strategy::Drop);
    let overall_risk = by_country
        .iter()
        .map(|c| c.risk)
        .max_by_key(|r| r.severity())
        .unwrap_or(RiskRating::High);

    MoleculeDecision {
        molecule: molecule.name.clone(),
        indication: market.indication.clone(),
        innovator: molecule.innovator.clone(),
        by_country,
        overall_strategy,
        overall_risk,
        priority_rank: 0,
        maturity_score: maturity.score,
        total_market_usd: market.total_market_usd,
        total_est_revenue_usd: market.total_est_revenue_usd,
    }
}

/// Globally rank decisions: strategy priority first, then total estimated
/// revenue descending. Dense 1-based ranks; molecules with an identical
/// sort key share a rank. The sort is stable, so re-runs on unchanged
/// input produce identical order and rank numbers.
pub fn rank_decisions(mut decisions: Vec<MoleculeDecision>) -> Vec<MoleculeDecision> {
    decisions.sort_by(|a, b| {
        a.overall_strategy
            .priority()
            .cmp(&b.overall_strategy.priority())
            .then(
                b.total_est_revenue_usd
                    .total_cmp(&a.total_est_revenue_usd),
            )
    });

    let mut rank = 0usize;
    let mut prev_key: Option<(u8, u64)> = None;
    for decision in decisions.iter_mut() {
        let key = (
            decision.overall_strategy.priority(),
            decision.total_est_revenue_usd.to_bits(),
        );
        if prev_key != Some(key) {
            rank += 1;
            prev_key = Some(key);
        }
        decision.priority_rank = rank;
    }
    decisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pharmalens_common::model::Modality;

    use crate::fto::{CliffHorizon, CountryFtoResult};
    use crate::market::{CountryMarket, MarketTier};
    use crate::maturity::CountryMaturity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn country_fto(status: FtoStatus, years: f64, primary: Option<bool>) -> CountryFtoResult {
        CountryFtoResult {
            molecule: "X".into(),
            country: "US".into(),
            status,
            entry_date: date(2027, 1, 1),
            years_to_clear: years,
            years_display: (years * 10.0).round() / 10.0,
            blocking_patents: if status == FtoStatus::Clear {
                vec![]
            } else {
                vec!["US-1".into()]
            },
            expired_patents: vec![],
            blocking_is_primary: primary,
            cliff_horizon: CliffHorizon::from_years(years),
            rationale: String::new(),
        }
    }

    fn fixture(
        status: FtoStatus,
        years: f64,
        score: i32,
        market_usd: f64,
        approved: bool,
        modality: Modality,
        indication: &str,
    ) -> (Molecule, FtoAssessment, MaturityAssessment, MarketAssessment) {
        let mut molecule = Molecule::new("X", indication, modality);
        molecule.innovator = "Innovator Pharma".into();
        let cf = country_fto(status, years, Some(true));
        let fto = FtoAssessment {
            molecule: "X".into(),
            by_country: vec![cf],
            overall: status,
            primary_expired: false,
            secondary_only_blocking: false,
        };
        let maturity = MaturityAssessment {
            molecule: "X".into(),
            highest_phase_completed: None,
            has_phase3_data: true,
            by_country: vec![CountryMaturity {
                country: "US".into(),
                has_local_trials: true,
                regulatory_status: if approved {
                    pharmalens_common::model::ApprovalStatus::Approved
                } else {
                    pharmalens_common::model::ApprovalStatus::NotFiled
                },
            }],
            risk_flags: vec![],
            score,
        };
        let market = MarketAssessment {
            molecule: "X".into(),
            indication: indication.into(),
            by_country: vec![CountryMarket {
                country: "US".into(),
                market_size_usd: market_usd,
                est_revenue_usd: market_usd * 0.03,
                tier: MarketTier::from_market_size(market_usd),
                source_year: Some(2024),
            }],
            total_market_usd: market_usd,
            total_est_revenue_usd: market_usd * 0.03,
        };
        (molecule, fto, maturity, market)
    }

    fn decide(
        status: FtoStatus,
        years: f64,
        score: i32,
        market_usd: f64,
        approved: bool,
        modality: Modality,
        indication: &str,
    ) -> MoleculeDecision {
        let (molecule, fto, maturity, market) =
            fixture(status, years, score, market_usd, approved, modality, indication);
        decide_molecule(&molecule, &fto, &maturity, &market, &DecisionPolicy::default())
    }

    #[test]
    fn test_row1_specialty_biologic_drops_regardless_of_market() {
        let d = decide(
            FtoStatus::Blocked,
            10.7,
            95,
            20e9,
            true,
            Modality::Antibody,
            "oncology",
        );
        assert_eq!(d.overall_strategy, Strategy::Drop);
        assert_eq!(d.overall_risk, RiskRating::High);
        assert_eq!(d.by_country[0].rule, "specialty-long-exclusivity");
        assert_eq!(d.by_country[0].gate, Gate::NoGo);
    }

    #[test]
    fn test_row1_needs_biologic_modality() {
        // Oncology small molecule with huge market and high maturity takes
        // the license row instead.
        let d = decide(
            FtoStatus::Blocked,
            10.7,
            95,
            20e9,
            true,
            Modality::SmallMolecule,
            "oncology",
        );
        assert_eq!(d.overall_strategy, Strategy::License);
        assert_eq!(d.by_country[0].rule, "license-big-prize");
    }

    #[test]
    fn test_row2_clear_approved_is_low_risk_go() {
        let d = decide(
            FtoStatus::Clear,
            0.0,
            80,
            2e9,
            true,
            Modality::SmallMolecule,
            "cardiovascular",
        );
        let call = &d.by_country[0];
        assert_eq!(call.strategy, Strategy::Generic);
        assert_eq!(call.risk, RiskRating::Low);
        assert_eq!(call.gate, Gate::Go);
        assert!(call.conditions.is_empty());
    }

    #[test]
    fn test_row2_clear_unapproved_is_conditional_medium() {
        let d = decide(
            FtoStatus::Clear,
            0.0,
            40,
            2e9,
            false,
            Modality::SmallMolecule,
            "cardiovascular",
        );
        let call = &d.by_country[0];
        assert_eq!(call.strategy, Strategy::Generic);
        assert_eq!(call.risk, RiskRating::Medium);
        assert_eq!(call.gate, Gate::Conditional);
        assert_eq!(call.conditions.len(), 1);
        assert!(call.conditions[0].contains("File"));
    }

    #[test]
    fn test_row3_expiring_soon_is_generic_medium() {
        let d = decide(
            FtoStatus::ExpiringSoon,
            1.2,
            50,
            6e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        let call = &d.by_country[0];
        assert_eq!(call.strategy, Strategy::Generic);
        assert_eq!(call.risk, RiskRating::Medium);
        assert_eq!(call.gate, Gate::Conditional);
        assert!(call.rationale.contains("1.2 years"));
        assert!(call
            .conditions
            .iter()
            .any(|c| c.contains("filing preparation")));
    }

    #[test]
    fn test_row4_wait_window_boundaries() {
        let wait = decide(
            FtoStatus::Blocked,
            3.0,
            80,
            10e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        assert_eq!(wait.overall_strategy, Strategy::Wait);
        // Exactly 4.0 still waits; 4.0001 moves past the window.
        let edge = decide(
            FtoStatus::Blocked,
            4.0,
            80,
            10e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        assert_eq!(edge.overall_strategy, Strategy::Wait);
        let past = decide(
            FtoStatus::Blocked,
            4.0001,
            80,
            10e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        assert_eq!(past.overall_strategy, Strategy::License);
    }

    #[test]
    fn test_row5_license_needs_market_and_maturity() {
        let licensed = decide(
            FtoStatus::Blocked,
            6.0,
            70,
            5e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        assert_eq!(licensed.overall_strategy, Strategy::License);
        assert!(licensed.by_country[0]
            .conditions
            .iter()
            .any(|c| c.contains("Innovator Pharma")));

        let small_market = decide(
            FtoStatus::Blocked,
            6.0,
            70,
            4.9e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        assert_eq!(small_market.overall_strategy, Strategy::Drop);

        let immature = decide(
            FtoStatus::Blocked,
            6.0,
            69,
            10e9,
            true,
            Modality::SmallMolecule,
            "type 2 diabetes",
        );
        assert_eq!(immature.overall_strategy, Strategy::Drop);
    }

    #[test]
    fn test_exactly_one_row_fires() {
        // Sweep boundary values; the chosen rule must be the first whose
        // predicate holds, and the unconditional last row guarantees a hit.
        for years in [0.0, 1.0, 2.0, 2.0001, 3.0, 4.0, 4.0001, 8.0] {
            let status = crate::fto::classify_years(years);
            let (molecule, fto, maturity, market) = fixture(
                status,
                years,
                70,
                5e9,
                false,
                Modality::SmallMolecule,
                "type 2 diabetes",
            );
            let ctx = RuleContext {
                molecule: &molecule,
                country: "US",
                fto: &fto.by_country[0],
                maturity: &maturity,
                market: &market,
                country_market: market.country("US"),
                is_specialty: false,
                approved_in_country: false,
            };
            let firing: Vec<&'static str> = DECISION_TABLE
                .iter()
                .filter(|r| (r.applies)(&ctx))
                .map(|r| r.name)
                .collect();
            assert!(!firing.is_empty());
            assert_eq!(decide_country(&ctx).rule, firing[0]);
        }
    }

    #[test]
    fn test_rollup_best_strategy_worst_risk() {
        let (molecule, mut fto, maturity, mut market) = fixture(
            FtoStatus::Clear,
            0.0,
            80,
            2e9,
            true,
            Modality::SmallMolecule,
            "cardiovascular",
        );
        // Second country: long block, small market → default drop.
        let mut blocked = country_fto(FtoStatus::Blocked, 9.0, Some(true));
        blocked.country = "IN".into();
        fto.by_country.push(blocked);
        market.by_country.push(CountryMarket {
            country: "IN".into(),
            market_size_usd: 0.2e9,
            est_revenue_usd: 0.2e9 * 0.08,
            tier: MarketTier::Low,
            source_year: Some(2024),
        });
        let d = decide_molecule(&molecule, &fto, &maturity, &market, &DecisionPolicy::default());
        assert_eq!(d.overall_strategy, Strategy::Generic); // optimistic
        assert_eq!(d.overall_risk, RiskRating::High); // pessimistic
    }

    #[test]
    fn test_ranking_order_and_stability() {
        let mk = |name: &str, strategy: Strategy, revenue: f64| {
            let (molecule, fto, maturity, market) = fixture(
                FtoStatus::Clear,
                0.0,
                80,
                1e9,
                true,
                Modality::SmallMolecule,
                "cardiovascular",
            );
            let mut d =
                decide_molecule(&molecule, &fto, &maturity, &market, &DecisionPolicy::default());
            d.molecule = name.to_string();
            d.overall_strategy = strategy;
            d.total_est_revenue_usd = revenue;
            d
        };
        let input = vec![
            mk("wait-small", Strategy::Wait, 1e7),
            mk("generic-small", Strategy::Generic, 5e7),
            mk("generic-big", Strategy::Generic, 3e8),
            mk("license-big", Strategy::License, 9e8),
            mk("drop", Strategy::Drop, 1e9),
        ];
        let ranked = rank_decisions(input.clone());
        let names: Vec<&str> = ranked.iter().map(|d| d.molecule.as_str()).collect();
        assert_eq!(
            names,
            vec!["generic-big", "generic-small", "license-big", "wait-small", "drop"]
        );
        assert_eq!(
            ranked.iter().map(|d| d.priority_rank).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        // Re-running on the same input reproduces order and rank numbers.
        let again = rank_decisions(input);
        assert_eq!(
            again.iter().map(|d| d.molecule.as_str()).collect::<Vec<_>>(),
            names
        );
    }
}

//! Pipeline orchestrator.
//!
//! One bulk read of reference data, a sequential scope gate, three spawned
//! analysis tasks joined before the decision stage, and a deterministic
//! join/reduce at the end. The pipeline holds no external resources and
//! performs no writes, so cancellation is all-or-nothing at the request
//! boundary and there is no partial-completion state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pharmalens_common::model::Molecule;
use pharmalens_common::policy::DecisionPolicy;
use pharmalens_store::ReferenceStore;

use crate::decision::{self, MoleculeDecision};
use crate::error::{PipelineError, Result};
use crate::fto::{self, FtoAssessment};
use crate::market::{self, MarketAssessment};
use crate::maturity::{self, MaturityAssessment};
use crate::scope::{self, QueryFilter};
use crate::summary::{self, DecisionSummary, UpcomingExpiry};

/// Molecule excluded from decisioning because a signal was missing at the
/// join. Countable and observable, never silent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedMolecule {
    pub molecule: String,
    pub missing: Vec<String>,
}

/// Final pipeline output handed to the report composer.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub asof: NaiveDate,
    pub canonical_indication: Option<String>,
    pub canonical_country: Option<String>,
    pub countries: Vec<String>,
    pub decisions: Vec<MoleculeDecision>,
    pub skipped: Vec<SkippedMolecule>,
    pub summary: DecisionSummary,
    pub upcoming_expiries: Vec<UpcomingExpiry>,
}

/// Terminal pipeline outcomes. An empty scope is a valid outcome, not an
/// error.
#[derive(Debug, Clone, Serialize)]
pub enum PipelineOutcome {
    NoMatches { filter: QueryFilter },
    Report(DecisionReport),
}

/// Join the three stage outputs by molecule name. A molecule missing any
/// signal is excluded from decisioning and recorded under `skipped` with the
/// names of the gaps, so a data hole in one reference table can never produce
/// a decision built on partial evidence.
fn join_signals(
    scoped: &[Molecule],
    fto_results: &[FtoAssessment],
    maturity_results: &[MaturityAssessment],
    market_results: &[MarketAssessment],
    policy: &DecisionPolicy,
) -> (Vec<MoleculeDecision>, Vec<SkippedMolecule>) {
    let mut decisions = Vec::with_capacity(scoped.len());
    let mut skipped = Vec::new();
    for molecule in scoped {
        let fto_hit = fto_results
            .iter()
            .find(|f| f.molecule.eq_ignore_ascii_case(&molecule.name));
        let maturity_hit = maturity_results
            .iter()
            .find(|m| m.molecule.eq_ignore_ascii_case(&molecule.name));
        let market_hit = market_results
            .iter()
            .find(|m| m.molecule.eq_ignore_ascii_case(&molecule.name));

        match (fto_hit, maturity_hit, market_hit) {
            (Some(f), Some(mat), Some(mkt)) => {
                decisions.push(decision::decide_molecule(molecule, f, mat, mkt, policy));
            }
            _ => {
                let mut missing = Vec::new();
                if fto_hit.is_none() {
                    missing.push("fto".to_string());
                }
                if maturity_hit.is_none() {
                    missing.push("maturity".to_string());
                }
                if market_hit.is_none() {
                    missing.push("market".to_string());
                }
                warn!(
                    stage = "decision",
                    molecule = %molecule.name,
                    missing = ?missing,
                    "Excluding molecule with incomplete signals"
                );
                skipped.push(SkippedMolecule {
                    molecule: molecule.name.clone(),
                    missing,
                });
            }
        }
    }
    (decisions, skipped)
}

pub struct CommercialPipeline {
    policy: DecisionPolicy,
}

impl CommercialPipeline {
    pub fn new(policy: DecisionPolicy) -> Self {
        Self { policy }
    }

    /// Run the full pipeline. Deterministic given the store contents, the
    /// policy, and `asof`.
    pub async fn run(
        &self,
        store: &dyn ReferenceStore,
        filter: &QueryFilter,
        asof: NaiveDate,
    ) -> Result<PipelineOutcome> {
        let molecules = store.list_molecules().await?;
        let scope = scope::resolve_scope(&molecules, filter, &self.policy);

        if scope.is_empty() {
            info!(stage = "scope", "No molecules matched the query filter");
            return Ok(PipelineOutcome::NoMatches {
                filter: filter.clone(),
            });
        }

        // A requested country narrows the evaluation; otherwise the policy's
        // target set applies.
        let countries: Vec<String> = match &scope.canonical_country {
            Some(c) => vec![c.clone()],
            None => self.policy.target_countries.clone(),
        };

        info!(
            stage = "scope",
            molecules = scope.molecules.len(),
            countries = countries.len(),
            "Scope resolved"
        );

        // The only blocking I/O: one bulk read per reference table.
        let patents = store.list_patents(None).await?;
        let trials = store.list_trials(None).await?;
        let regulatory = store.list_regulatory_status(None).await?;
        let markets = store.list_disease_market(None).await?;

        // Stages 2–4 are data-independent given the scope; dispatch them as
        // three tasks and join before decisioning.
        let scoped: Vec<Molecule> = scope.molecules.clone();
        let policy = self.policy.clone();

        let fto_task = {
            let scoped = scoped.clone();
            let countries = countries.clone();
            tokio::task::spawn(async move {
                scoped
                    .iter()
                    .map(|m| fto::analyze_molecule(m, &patents, &countries, asof))
                    .collect::<Vec<FtoAssessment>>()
            })
        };
        let maturity_task = {
            let scoped = scoped.clone();
            let countries = countries.clone();
            tokio::task::spawn(async move {
                scoped
                    .iter()
                    .map(|m| {
                        let own_trials: Vec<_> = trials
                            .iter()
                            .filter(|t| t.molecule.eq_ignore_ascii_case(&m.name))
                            .cloned()
                            .collect();
                        let own_regulatory: Vec<_> = regulatory
                            .iter()
                            .filter(|r| r.molecule.eq_ignore_ascii_case(&m.name))
                            .cloned()
                            .collect();
                        maturity::assess_maturity(m, &own_trials, &own_regulatory, &countries)
                    })
                    .collect::<Vec<MaturityAssessment>>()
            })
        };
        let market_task = {
            let scoped = scoped.clone();
            let countries = countries.clone();
            let policy = policy.clone();
            tokio::task::spawn(async move {
                scoped
                    .iter()
                    .map(|m| market::assess_market(m, &markets, &countries, &policy))
                    .collect::<Vec<MarketAssessment>>()
            })
        };

        let (fto_results, maturity_results, market_results) =
            tokio::try_join!(fto_task, maturity_task, market_task)
                .map_err(|e| PipelineError::Task(e.to_string()))?;

        // Stage 5: join by molecule name, decide, rank.
        let (decisions, skipped) = join_signals(
            &scoped,
            &fto_results,
            &maturity_results,
            &market_results,
            &self.policy,
        );

        let decisions = decision::rank_decisions(decisions);
        let summary = summary::summarize(&decisions, skipped.len());
        let upcoming_expiries = summary::upcoming_expiries(&fto_results);

        info!(
            stage = "decision",
            decided = decisions.len(),
            skipped = skipped.len(),
            generic = summary.generic,
            license = summary.license,
            wait = summary.wait,
            dropped = summary.drop,
            "Pipeline complete"
        );

        Ok(PipelineOutcome::Report(DecisionReport {
            asof,
            canonical_indication: scope.canonical_indication,
            canonical_country: scope.canonical_country,
            countries,
            decisions,
            skipped,
            summary,
            upcoming_expiries,
        }))
    }
}

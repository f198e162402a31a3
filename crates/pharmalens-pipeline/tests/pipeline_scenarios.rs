//! End-to-end pipeline scenarios over the seeded reference portfolio.

use async_trait::async_trait;

use pharmalens_common::model::{
    ApprovalStatus, Modality, PatentType, TrialOutcome, TrialPhase, TrialStatus,
};
use pharmalens_common::policy::DecisionPolicy;
use pharmalens_pipeline::{
    CommercialPipeline, FtoStatus, Gate, PipelineError, PipelineOutcome, QueryFilter, RiskRating,
    Strategy,
};
use pharmalens_store::{MemoryStore, ReferenceStore, StoreError};
use pharmalens_test_utils as fixtures;

fn pipeline() -> CommercialPipeline {
    CommercialPipeline::new(DecisionPolicy::default())
}

fn report(outcome: PipelineOutcome) -> pharmalens_pipeline::DecisionReport {
    match outcome {
        PipelineOutcome::Report(r) => r,
        PipelineOutcome::NoMatches { .. } => panic!("expected a report"),
    }
}

#[tokio::test]
async fn scenario_expiring_secondary_patent_yields_generic() {
    // Expired compound patent, one secondary patent 1.2 years out, strong
    // clinical package, $6B US market.
    let store = MemoryStore::new()
        .with_molecule(fixtures::molecule(
            "Xellastat",
            "type 2 diabetes",
            Modality::SmallMolecule,
            "Apex Pharma",
            None,
        ))
        .with_patent(fixtures::patent(
            "Xellastat",
            "US",
            "US-9000001",
            PatentType::Compound,
            fixtures::date(1995, 5, 1),
            fixtures::date(2015, 5, 1),
        ))
        .with_patent(fixtures::patent(
            "Xellastat",
            "US",
            "US-9000002",
            PatentType::Formulation,
            fixtures::date(2005, 12, 13),
            fixtures::date(2025, 12, 13),
        ))
        .with_trial(fixtures::trial(
            "Xellastat",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "US",
            Some(TrialOutcome::Positive),
        ))
        .with_trial(fixtures::trial(
            "Xellastat",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "IN",
            Some(TrialOutcome::Positive),
        ))
        .with_trial(fixtures::trial(
            "Xellastat",
            TrialPhase::PhaseIV,
            TrialStatus::Completed,
            "US",
            Some(TrialOutcome::Positive),
        ))
        .with_regulatory(fixtures::approval(
            "Xellastat",
            "US",
            ApprovalStatus::Approved,
        ))
        .with_regulatory(fixtures::approval(
            "Xellastat",
            "IN",
            ApprovalStatus::UnderReview,
        ))
        .with_market(fixtures::market(
            "type 2 diabetes",
            "US",
            2024,
            10_000_000,
            60.0,
            1_000.0,
        ));

    let filter = QueryFilter {
        molecule_name: Some("Xellastat".into()),
        ..Default::default()
    };
    let outcome = pipeline()
        .run(&store, &filter, fixtures::asof())
        .await
        .unwrap();
    let report = report(outcome);

    assert_eq!(report.decisions.len(), 1);
    let decision = &report.decisions[0];
    assert_eq!(decision.overall_strategy, Strategy::Generic);
    assert_eq!(decision.overall_risk, RiskRating::Medium);
    assert!(decision.maturity_score >= 70, "got {}", decision.maturity_score);

    let us = decision
        .by_country
        .iter()
        .find(|c| c.country == "US")
        .unwrap();
    assert_eq!(us.strategy, Strategy::Generic);
    assert_eq!(us.risk, RiskRating::Medium);
    assert_eq!(us.rule, "expiring-soon-generic");
    assert!(us.rationale.contains("1.2 years"));
    assert!(us.rationale.contains("secondary"));

    // The timeline view carries the 1.2-year window.
    assert_eq!(report.upcoming_expiries.len(), 1);
    assert_eq!(report.upcoming_expiries[0].years_to_expiry, 1.2);
    assert_eq!(
        report.upcoming_expiries[0].expiry_date,
        fixtures::date(2025, 12, 13)
    );
}

#[tokio::test]
async fn scenario_oncology_biologic_drops_by_rule_precedence() {
    // Herceptin resolves by brand name; the specialty row outranks the
    // large oncology market and a decent maturity score.
    let store = fixtures::seed_store();
    let filter = QueryFilter {
        molecule_name: Some("herceptin".into()),
        ..Default::default()
    };
    let outcome = pipeline()
        .run(&store, &filter, fixtures::asof())
        .await
        .unwrap();
    let report = report(outcome);

    assert_eq!(report.decisions.len(), 1);
    let decision = &report.decisions[0];
    assert_eq!(decision.molecule, "Trastuzumab");
    assert_eq!(decision.overall_strategy, Strategy::Drop);
    assert_eq!(decision.overall_risk, RiskRating::High);
    for call in &decision.by_country {
        assert_eq!(call.rule, "specialty-long-exclusivity");
        assert_eq!(call.gate, Gate::NoGo);
    }
}

#[tokio::test]
async fn unmatched_indication_terminates_with_no_matches() {
    let store = fixtures::seed_store();
    let filter = QueryFilter {
        indication: Some("parkinson's disease".into()),
        ..Default::default()
    };
    let outcome = pipeline()
        .run(&store, &filter, fixtures::asof())
        .await
        .unwrap();
    assert!(matches!(outcome, PipelineOutcome::NoMatches { .. }));
}

#[tokio::test]
async fn full_portfolio_ranking_and_summary() {
    let store = fixtures::seed_store();
    let outcome = pipeline()
        .run(&store, &QueryFilter::default(), fixtures::asof())
        .await
        .unwrap();
    let report = report(outcome);

    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.generic, 4);
    assert_eq!(report.summary.drop, 1);
    assert_eq!(report.summary.skipped, 0);
    assert!(report.skipped.is_empty());

    // GENERIC tier leads; the lone DROP lands last.
    assert_eq!(report.decisions.first().unwrap().overall_strategy, Strategy::Generic);
    let last = report.decisions.last().unwrap();
    assert_eq!(last.molecule, "Trastuzumab");
    assert_eq!(last.overall_strategy, Strategy::Drop);

    // Within the GENERIC tier revenue sorts descending; Sitagliptin and
    // Semaglutide share identical revenue and therefore a dense rank.
    let names: Vec<&str> = report
        .decisions
        .iter()
        .map(|d| d.molecule.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Sitagliptin",
            "Semaglutide",
            "Atorvastatin",
            "Vorolanib",
            "Trastuzumab"
        ]
    );
    let ranks: Vec<usize> = report.decisions.iter().map(|d| d.priority_rank).collect();
    assert_eq!(ranks, vec![1, 1, 2, 3, 4]);

    // Semaglutide: blocked US becomes a LICENSE row, expiring IN keeps the
    // headline GENERIC; risk rolls up pessimistically.
    let semaglutide = report
        .decisions
        .iter()
        .find(|d| d.molecule == "Semaglutide")
        .unwrap();
    assert_eq!(semaglutide.overall_strategy, Strategy::Generic);
    assert_eq!(semaglutide.overall_risk, RiskRating::High);
    let us = semaglutide
        .by_country
        .iter()
        .find(|c| c.country == "US")
        .unwrap();
    assert_eq!(us.strategy, Strategy::License);
    assert!(us.conditions.iter().any(|c| c.contains("Novo Nordisk")));

    // Timeline ascending by date.
    let dates: Vec<_> = report
        .upcoming_expiries
        .iter()
        .map(|e| e.expiry_date)
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);
    assert_eq!(report.upcoming_expiries.len(), 5);
    assert_eq!(report.upcoming_expiries[0].molecule, "Sitagliptin");

    // Determinism: an identical re-run reproduces order and ranks.
    let again = report_from(&store).await;
    let names_again: Vec<&str> = again
        .decisions
        .iter()
        .map(|d| d.molecule.as_str())
        .collect();
    assert_eq!(names, names_again);
    assert_eq!(
        ranks,
        again
            .decisions
            .iter()
            .map(|d| d.priority_rank)
            .collect::<Vec<_>>()
    );
}

async fn report_from(store: &MemoryStore) -> pharmalens_pipeline::DecisionReport {
    let outcome = pipeline()
        .run(store, &QueryFilter::default(), fixtures::asof())
        .await
        .unwrap();
    report(outcome)
}

#[tokio::test]
async fn country_filter_narrows_evaluation() {
    let store = fixtures::seed_store();
    let filter = QueryFilter {
        country: Some("india".into()),
        molecule_name: Some("Semaglutide".into()),
        ..Default::default()
    };
    let outcome = pipeline()
        .run(&store, &filter, fixtures::asof())
        .await
        .unwrap();
    let report = report(outcome);

    assert_eq!(report.countries, vec!["IN".to_string()]);
    let decision = &report.decisions[0];
    assert_eq!(decision.by_country.len(), 1);
    // Only the IN window matters here: expiring soon → generic.
    assert_eq!(decision.overall_strategy, Strategy::Generic);
    assert_eq!(decision.by_country[0].strategy, Strategy::Generic);
}

#[tokio::test]
async fn clear_portfolio_molecule_gets_immediate_go() {
    let store = fixtures::seed_store();
    let filter = QueryFilter {
        molecule_name: Some("Lipitor".into()),
        ..Default::default()
    };
    let report = report(
        pipeline()
            .run(&store, &filter, fixtures::asof())
            .await
            .unwrap(),
    );
    let decision = &report.decisions[0];
    assert_eq!(decision.molecule, "Atorvastatin");
    assert_eq!(decision.overall_strategy, Strategy::Generic);
    assert_eq!(decision.overall_risk, RiskRating::Low);
    for call in &decision.by_country {
        assert_eq!(call.gate, Gate::Go);
        assert!(call.conditions.is_empty());
    }
}

#[tokio::test]
async fn missing_market_data_still_produces_decision() {
    let store = fixtures::seed_store();
    let filter = QueryFilter {
        molecule_name: Some("Vorolanib".into()),
        ..Default::default()
    };
    let report = report(
        pipeline()
            .run(&store, &filter, fixtures::asof())
            .await
            .unwrap(),
    );
    let decision = &report.decisions[0];
    assert_eq!(decision.total_market_usd, 0.0);
    assert_eq!(decision.total_est_revenue_usd, 0.0);
    // No patents anywhere is the maximally favorable FTO case.
    assert_eq!(decision.overall_strategy, Strategy::Generic);
    // Unapproved everywhere, so entry stays conditional on filings.
    assert!(decision
        .by_country
        .iter()
        .all(|c| c.gate == Gate::Conditional));
}

// ── Store failure semantics ──────────────────────────────────────────────────

struct FailingStore;

#[async_trait]
impl ReferenceStore for FailingStore {
    async fn list_molecules(
        &self,
    ) -> Result<Vec<pharmalens_common::model::Molecule>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn list_patents(
        &self,
        _molecule: Option<&str>,
    ) -> Result<Vec<pharmalens_common::model::PatentRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn list_trials(
        &self,
        _molecule: Option<&str>,
    ) -> Result<Vec<pharmalens_common::model::ClinicalTrialRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn list_regulatory_status(
        &self,
        _molecule: Option<&str>,
    ) -> Result<Vec<pharmalens_common::model::RegulatoryStatusRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
    async fn list_disease_market(
        &self,
        _indication: Option<&str>,
    ) -> Result<Vec<pharmalens_common::model::DiseaseMarketRecord>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn unreachable_store_fails_the_whole_invocation() {
    let result = pipeline()
        .run(&FailingStore, &QueryFilter::default(), fixtures::asof())
        .await;
    assert!(matches!(result, Err(PipelineError::Store(_))));
}

#[tokio::test]
async fn fto_statuses_visible_in_report_detail() {
    let store = fixtures::seed_store();
    let report = report_from(&store).await;
    let sitagliptin = report
        .decisions
        .iter()
        .find(|d| d.molecule == "Sitagliptin")
        .unwrap();
    let us = sitagliptin
        .by_country
        .iter()
        .find(|c| c.country == "US")
        .unwrap();
    assert_eq!(us.rule, "expiring-soon-generic");
    assert!(us.rationale.contains("2025-12-13"));

    // Severity ordering backs every rollup in the report.
    assert!(FtoStatus::Blocked.severity() > FtoStatus::ExpiringSoon.severity());
    assert!(FtoStatus::ExpiringSoon.severity() > FtoStatus::Clear.severity());
}

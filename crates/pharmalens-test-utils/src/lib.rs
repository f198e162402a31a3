//! Shared test fixtures: record constructors and a seeded reference store.
//!
//! The seed dataset is a small but realistic portfolio exercising every
//! decision branch: a clear generic, an expiring-soon entry, a blocked
//! license candidate, a specialty drop, and a molecule with no market data.

use chrono::NaiveDate;
use uuid::Uuid;

use pharmalens_common::model::{
    ApprovalStatus, ApprovalTrack, ClinicalTrialRecord, DiseaseMarketRecord, Modality, Molecule,
    PatentRecord, PatentType, RegulatoryStatusRecord, TrialOutcome, TrialPhase, TrialStatus,
};
use pharmalens_store::MemoryStore;

/// Fixed evaluation date used across test suites.
pub fn asof() -> NaiveDate {
    date(2024, 10, 1)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

pub fn molecule(
    name: &str,
    indication: &str,
    modality: Modality,
    innovator: &str,
    brand: Option<&str>,
) -> Molecule {
    Molecule {
        id: Uuid::new_v4(),
        name: name.into(),
        generic_name: Some(name.to_lowercase()),
        brand_name: brand.map(Into::into),
        indication: indication.into(),
        modality,
        innovator: innovator.into(),
    }
}

pub fn patent(
    molecule: &str,
    country: &str,
    number: &str,
    patent_type: PatentType,
    filing: NaiveDate,
    expiry: NaiveDate,
) -> PatentRecord {
    PatentRecord {
        id: Uuid::new_v4(),
        molecule: molecule.into(),
        country: country.into(),
        patent_number: number.into(),
        patent_type,
        filing_date: filing,
        expiry_date: expiry,
    }
}

pub fn trial(
    molecule: &str,
    phase: TrialPhase,
    status: TrialStatus,
    country: &str,
    outcome: Option<TrialOutcome>,
) -> ClinicalTrialRecord {
    ClinicalTrialRecord {
        id: Uuid::new_v4(),
        molecule: molecule.into(),
        phase,
        status,
        country: country.into(),
        sponsor: "Fixture Sponsor".into(),
        outcome,
        completion_date: Some(date(2023, 6, 30)),
    }
}

pub fn approval(molecule: &str, country: &str, status: ApprovalStatus) -> RegulatoryStatusRecord {
    RegulatoryStatusRecord {
        id: Uuid::new_v4(),
        molecule: molecule.into(),
        country: country.into(),
        status,
        approval_date: (status == ApprovalStatus::Approved).then(|| date(2021, 4, 12)),
        track: Some(ApprovalTrack::FullApplication),
    }
}

pub fn market(
    disease: &str,
    country: &str,
    year: i32,
    prevalence: u64,
    treated_rate_pct: f64,
    avg_annual_cost: f64,
) -> DiseaseMarketRecord {
    DiseaseMarketRecord {
        id: Uuid::new_v4(),
        disease: disease.into(),
        country: country.into(),
        year,
        prevalence,
        treated_rate_pct,
        avg_annual_cost,
        market_size_usd: None,
    }
}

/// Reference portfolio evaluated at [`asof`] (2024-10-01):
///
/// - **Atorvastatin**: every patent long expired, approved in both
///   countries: the clean GENERIC case.
/// - **Sitagliptin**: expired US compound patent, US formulation patent
///   to 2025-12-13 (1.2 years): EXPIRING_SOON, secondary-only blocking.
/// - **Semaglutide**: US compound patent to 2031 (blocked, license
///   candidate), IN compound patent to 2026-03 (expiring soon).
/// - **Trastuzumab**: oncology antibody blocked past 2033 in both
///   countries: the specialty DROP case.
/// - **Vorolanib**: no patents and no market data anywhere: clear entry
///   into a zero-size LOW market.
pub fn seed_store() -> MemoryStore {
    MemoryStore::new()
        // Atorvastatin
        .with_molecule(molecule(
            "Atorvastatin",
            "cardiovascular",
            Modality::SmallMolecule,
            "Pfizer",
            Some("Lipitor"),
        ))
        .with_patent(patent(
            "Atorvastatin",
            "US",
            "US-4681893",
            PatentType::Compound,
            date(1986, 5, 30),
            date(2011, 11, 30),
        ))
        .with_trial(trial(
            "Atorvastatin",
            TrialPhase::PhaseIV,
            TrialStatus::Completed,
            "US",
            Some(TrialOutcome::Positive),
        ))
        .with_trial(trial(
            "Atorvastatin",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "IN",
            Some(TrialOutcome::Positive),
        ))
        .with_regulatory(approval("Atorvastatin", "US", ApprovalStatus::Approved))
        .with_regulatory(approval("Atorvastatin", "IN", ApprovalStatus::Approved))
        // Sitagliptin
        .with_molecule(molecule(
            "Sitagliptin",
            "type 2 diabetes",
            Modality::SmallMolecule,
            "Merck",
            Some("Januvia"),
        ))
        .with_patent(patent(
            "Sitagliptin",
            "US",
            "US-6699871",
            PatentType::Compound,
            date(2002, 7, 5),
            date(2022, 7, 5),
        ))
        .with_patent(patent(
            "Sitagliptin",
            "US",
            "US-7326708",
            PatentType::Formulation,
            date(2005, 6, 24),
            date(2025, 12, 13),
        ))
        .with_patent(patent(
            "Sitagliptin",
            "IN",
            "IN-209816",
            PatentType::Compound,
            date(2002, 7, 5),
            date(2022, 7, 5),
        ))
        .with_trial(trial(
            "Sitagliptin",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "US",
            Some(TrialOutcome::Positive),
        ))
        .with_trial(trial(
            "Sitagliptin",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "IN",
            None,
        ))
        .with_regulatory(approval("Sitagliptin", "US", ApprovalStatus::Approved))
        .with_regulatory(approval("Sitagliptin", "IN", ApprovalStatus::Approved))
        // Semaglutide
        .with_molecule(molecule(
            "Semaglutide",
            "type 2 diabetes",
            Modality::Peptide,
            "Novo Nordisk",
            Some("Ozempic"),
        ))
        .with_patent(patent(
            "Semaglutide",
            "US",
            "US-8129343",
            PatentType::Compound,
            date(2006, 3, 20),
            date(2031, 12, 5),
        ))
        .with_patent(patent(
            "Semaglutide",
            "IN",
            "IN-287163",
            PatentType::Compound,
            date(2006, 3, 20),
            date(2026, 3, 20),
        ))
        .with_trial(trial(
            "Semaglutide",
            TrialPhase::PhaseIV,
            TrialStatus::Completed,
            "US",
            Some(TrialOutcome::Positive),
        ))
        .with_trial(trial(
            "Semaglutide",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "IN",
            Some(TrialOutcome::Positive),
        ))
        .with_regulatory(approval("Semaglutide", "US", ApprovalStatus::Approved))
        .with_regulatory(approval("Semaglutide", "IN", ApprovalStatus::Approved))
        // Trastuzumab
        .with_molecule(molecule(
            "Trastuzumab",
            "oncology",
            Modality::Antibody,
            "Roche",
            Some("Herceptin"),
        ))
        .with_patent(patent(
            "Trastuzumab",
            "US",
            "US-10273304",
            PatentType::Compound,
            date(2015, 6, 1),
            date(2035, 6, 1),
        ))
        .with_patent(patent(
            "Trastuzumab",
            "IN",
            "IN-391045",
            PatentType::Compound,
            date(2013, 9, 1),
            date(2033, 9, 1),
        ))
        .with_trial(trial(
            "Trastuzumab",
            TrialPhase::PhaseIII,
            TrialStatus::Completed,
            "US",
            Some(TrialOutcome::Positive),
        ))
        .with_regulatory(approval("Trastuzumab", "US", ApprovalStatus::Approved))
        .with_regulatory(approval("Trastuzumab", "IN", ApprovalStatus::UnderReview))
        // Vorolanib
        .with_molecule(molecule(
            "Vorolanib",
            "alopecia",
            Modality::SmallMolecule,
            "Equinox Sciences",
            None,
        ))
        .with_trial(trial(
            "Vorolanib",
            TrialPhase::PhaseII,
            TrialStatus::Recruiting,
            "US",
            None,
        ))
        // Disease markets
        .with_market(market("cardiovascular", "US", 2024, 18_000_000, 55.0, 500.0))
        .with_market(market("cardiovascular", "IN", 2024, 30_000_000, 20.0, 100.0))
        .with_market(market("type 2 diabetes", "US", 2024, 10_000_000, 60.0, 1_000.0))
        .with_market(market("type 2 diabetes", "IN", 2024, 40_000_000, 25.0, 200.0))
        .with_market(market("oncology", "US", 2024, 2_000_000, 50.0, 8_000.0))
        .with_market(market("oncology", "IN", 2024, 5_000_000, 30.0, 1_000.0))
}

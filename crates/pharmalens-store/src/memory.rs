//! In-memory reference store.
//!
//! Builder-style fixture store used by unit tests, integration scenarios,
//! and demos. Also doubles as the shape a bulk-loaded production snapshot
//! takes once fetched.

use async_trait::async_trait;

use pharmalens_common::model::{
    ClinicalTrialRecord, DiseaseMarketRecord, Molecule, PatentRecord, RegulatoryStatusRecord,
};

use crate::error::Result;
use crate::ReferenceStore;

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    molecules: Vec<Molecule>,
    patents: Vec<PatentRecord>,
    trials: Vec<ClinicalTrialRecord>,
    regulatory: Vec<RegulatoryStatusRecord>,
    markets: Vec<DiseaseMarketRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_molecule(mut self, molecule: Molecule) -> Self {
        self.molecules.push(molecule);
        self
    }

    pub fn with_patent(mut self, patent: PatentRecord) -> Self {
        self.patents.push(patent);
        self
    }

    pub fn with_trial(mut self, trial: ClinicalTrialRecord) -> Self {
        self.trials.push(trial);
        self
    }

    pub fn with_regulatory(mut self, record: RegulatoryStatusRecord) -> Self {
        self.regulatory.push(record);
        self
    }

    pub fn with_market(mut self, record: DiseaseMarketRecord) -> Self {
        self.markets.push(record);
        self
    }
}

#[async_trait]
impl ReferenceStore for MemoryStore {
    async fn list_molecules(&self) -> Result<Vec<Molecule>> {
        Ok(self.molecules.clone())
    }

    async fn list_patents(&self, molecule: Option<&str>) -> Result<Vec<PatentRecord>> {
        Ok(self
            .patents
            .iter()
            .filter(|p| molecule.is_none_or(|m| p.molecule.eq_ignore_ascii_case(m)))
            .cloned()
            .collect())
    }

    async fn list_trials(&self, molecule: Option<&str>) -> Result<Vec<ClinicalTrialRecord>> {
        Ok(self
            .trials
            .iter()
            .filter(|t| molecule.is_none_or(|m| t.molecule.eq_ignore_ascii_case(m)))
            .cloned()
            .collect())
    }

    async fn list_regulatory_status(
        &self,
        molecule: Option<&str>,
    ) -> Result<Vec<RegulatoryStatusRecord>> {
        Ok(self
            .regulatory
            .iter()
            .filter(|r| molecule.is_none_or(|m| r.molecule.eq_ignore_ascii_case(m)))
            .cloned()
            .collect())
    }

    async fn list_disease_market(
        &self,
        indication: Option<&str>,
    ) -> Result<Vec<DiseaseMarketRecord>> {
        Ok(self
            .markets
            .iter()
            .filter(|d| indication.is_none_or(|i| d.disease.eq_ignore_ascii_case(i)))
            .cloned()
            .collect())
    }
}

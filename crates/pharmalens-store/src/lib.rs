//! Pharmalens reference store contract.
//!
//! The commercial pipeline never talks to a storage engine directly; it
//! consumes this read-only trait. Implementations can back it with:
//! - a relational store (production)
//! - an in-memory dataset ([`MemoryStore`], tests and demos)
//!
//! Bulk accessors only; the pipeline does its own joining and filtering.
//! A failing store is fatal to the whole invocation: the pipeline never
//! returns a partial report over half-fetched reference data.

pub mod error;
pub mod memory;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;

use async_trait::async_trait;

use pharmalens_common::model::{
    ClinicalTrialRecord, DiseaseMarketRecord, Molecule, PatentRecord, RegulatoryStatusRecord,
};

/// Read-only access to pharmaceutical reference data.
#[async_trait]
pub trait ReferenceStore: Send + Sync {
    /// All molecule identity records.
    async fn list_molecules(&self) -> Result<Vec<Molecule>>;

    /// Patent grants, optionally restricted to one molecule name.
    async fn list_patents(&self, molecule: Option<&str>) -> Result<Vec<PatentRecord>>;

    /// Clinical trial records, optionally restricted to one molecule name.
    async fn list_trials(&self, molecule: Option<&str>) -> Result<Vec<ClinicalTrialRecord>>;

    /// Regulatory filings, optionally restricted to one molecule name.
    async fn list_regulatory_status(
        &self,
        molecule: Option<&str>,
    ) -> Result<Vec<RegulatoryStatusRecord>>;

    /// Disease-market sizing records, optionally restricted to one
    /// canonical indication.
    async fn list_disease_market(
        &self,
        indication: Option<&str>,
    ) -> Result<Vec<DiseaseMarketRecord>>;
}

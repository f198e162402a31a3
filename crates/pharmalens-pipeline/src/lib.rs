//! pharmalens-pipeline — Commercial decision pipeline.
//!
//! Five deterministic stages over read-only reference data:
//! 1. Scope resolution (query filter → molecule set)
//! 2. Freedom-to-operate analysis (patent windows per country)
//! 3. Clinical/regulatory maturity scoring
//! 4. Addressable-market estimation
//! 5. Decision join: per-country recommendation, rollup, global ranking
//!
//! Stages 2–4 are data-independent given stage 1's output and run as three
//! joined tasks. Stage 5 is a pure join/reduce. Given a fixed store, policy,
//! and evaluation date the whole pipeline is deterministic.

pub mod decision;
pub mod error;
pub mod fto;
pub mod market;
pub mod maturity;
pub mod pipeline;
pub mod scope;
pub mod summary;
pub mod weights;

pub use decision::{CountryCall, Gate, MoleculeDecision, RiskRating, Strategy};
pub use error::{PipelineError, Result};
pub use fto::{CountryFtoResult, FtoAssessment, FtoStatus};
pub use market::{CountryMarket, MarketAssessment, MarketTier};
pub use maturity::{MaturityAssessment, RiskFlag};
pub use pipeline::{CommercialPipeline, DecisionReport, PipelineOutcome, SkippedMolecule};
pub use scope::{QueryFilter, ScopeResolution};
pub use summary::{DecisionSummary, UpcomingExpiry};

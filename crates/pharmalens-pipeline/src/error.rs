//! Pipeline error types.
//!
//! Empty results are never errors here: an empty scope, a molecule with no
//! patents, or a missing market record are all valid zero-value inputs. The
//! only fatal conditions are a failing reference store and a crashed stage
//! task, both of which must fail the whole invocation rather than produce a
//! silently partial report.

use thiserror::Error;

use pharmalens_store::StoreError;

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Reference store failure: {0}")]
    Store(#[from] StoreError),

    #[error("Stage task failed: {0}")]
    Task(String),
}

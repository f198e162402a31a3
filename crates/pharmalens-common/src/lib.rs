//! pharmalens-common — Shared model types, errors, and policy configuration
//! used across all Pharmalens crates.

pub mod error;
pub mod model;
pub mod policy;

// Re-export commonly used types
pub use error::{PharmalensError, Result};
pub use policy::DecisionPolicy;

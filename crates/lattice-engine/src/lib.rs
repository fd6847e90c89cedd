//! Orchestration facade: build a test plan from a model, run it against an
//! oracle, and characterize whatever fails.

pub mod plan;
pub mod session;

use lattice_gen::GenerationError;
use lattice_locate::{CharacterizeError, OracleError};

pub use plan::{plan, PlanConfig, TestPlan};
pub use session::{Session, SessionReport};

/// Failures the facade itself can hit. Model and checker errors surface
/// from the lower crates before a plan or session exists, wrapped in the
/// generation and characterization variants.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("characterization error: {0}")]
    Characterize(#[from] CharacterizeError),
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
}

//! Fault characterization: given a failing test input, isolate the
//! failure-inducing combinations of parameter values behind it.
//!
//! Three strategies are available. `Fic` probes one position at a time,
//! `FicBs` bisects batches of positions, and `Ict` interleaves isolation
//! with covering-array generation so learned faults steer further probing.
//! All of them talk to the system under test through the [`Oracle`] trait
//! and deduplicate queries with a [`CachedOracle`].

mod bisect;
mod fic;
mod finder;
mod ict;
pub mod oracle;

use std::collections::BTreeMap;

use lattice_gen::GenerationError;
use lattice_model::{Combination, TestModel};
use lattice_solver::CheckerError;
use serde::{Deserialize, Serialize};

pub use oracle::{CachedOracle, Oracle, OracleError, Verdict};

/// The closed set of characterization strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Fic,
    FicBs,
    Ict,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterizationConfig {
    pub strategy: Strategy,
    /// Failing dissimilar embeddings required beyond the first before an
    /// `Ict` candidate is accepted.
    pub feedback_checks: usize,
    /// Seed for the generator backing `Ict`.
    pub seed: u64,
}

impl Default for CharacterizationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Fic,
            feedback_checks: 5,
            seed: 42,
        }
    }
}

/// One isolated failure-inducing combination. Unset slots are irrelevant
/// to the failure; a fully unset combination marks a failure that no
/// single position accounts for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub combination: Combination,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Characterization {
    pub faults: Vec<Fault>,
}

impl Characterization {
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn combinations(&self) -> Vec<Combination> {
        self.faults.iter().map(|f| f.combination.clone()).collect()
    }

    /// Faults grouped by violated condition, deterministically ordered.
    pub fn group_by_condition(&self) -> BTreeMap<Option<String>, Vec<Combination>> {
        let mut groups: BTreeMap<Option<String>, Vec<Combination>> = BTreeMap::new();
        for fault in &self.faults {
            groups
                .entry(fault.condition.clone())
                .or_default()
                .push(fault.combination.clone());
        }
        groups
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CharacterizeError {
    #[error("oracle failure: {0}")]
    Oracle(#[from] OracleError),
    #[error("constraint checker error: {0}")]
    Checker(#[from] CheckerError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("failing input must be fully assigned, {missing} parameters unset")]
    IncompleteInput { missing: usize },
}

/// Characterizes one failing test input against the oracle.
///
/// A `failing` input that actually passes yields an empty result; only
/// incomplete inputs and transport failures are errors.
pub fn characterize<O: Oracle>(
    config: &CharacterizationConfig,
    model: &TestModel,
    failing: &Combination,
    oracle: &mut O,
) -> Result<Characterization, CharacterizeError> {
    let parameters = model.number_of_parameters();
    if failing.width() != parameters || !failing.is_complete() {
        return Err(CharacterizeError::IncompleteInput {
            missing: parameters.saturating_sub(failing.assigned_count()),
        });
    }

    let mut cached = CachedOracle::new(&mut *oracle);
    if let Verdict::Pass = cached.execute(failing)? {
        return Ok(Characterization::default());
    }

    let faults = match config.strategy {
        Strategy::Fic => {
            finder::find_non_overlapping(model, failing, &mut cached, fic::locate_linear)?
        }
        Strategy::FicBs => {
            finder::find_non_overlapping(model, failing, &mut cached, bisect::locate_bisect)?
        }
        Strategy::Ict => ict::characterize_interleaved(
            model,
            failing,
            config.feedback_checks,
            config.seed,
            &mut cached,
        )?,
    };

    Ok(Characterization { faults })
}

//! Greedy AETG-style covering-array construction.
//!
//! Each round builds up to K candidate rows. A candidate starts from one
//! uncovered tuple and is completed parameter-by-parameter: at every unset
//! slot the extension-valid value with the highest optimistic coverage gain
//! wins, ties going to the lowest value index. The round keeps the candidate
//! covering the most tuples, ties going to the first one built. Candidate 0
//! always seeds from the first uncovered tuple so every round that can make
//! progress does; the remaining seeds are drawn from a ChaCha8 stream, so a
//! fixed seed reproduces the suite exactly.

use lattice_model::{Combination, TestModel};
use lattice_solver::{CheckerError, DynamicConstraintChecker};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::coverage::CoverageMap;

/// Errors during generation. An unsatisfiable or overconstrained model is
/// not an error; it shows up as `complete = false` in the report.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("constraint checker error: {0}")]
    Checker(#[from] CheckerError),
}

/// Tunables for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AetgConfig {
    /// Candidate rows built per round (the K of the algorithm).
    pub candidates_per_round: usize,
    /// Seed for candidate-tuple selection.
    pub seed: u64,
}

impl Default for AetgConfig {
    fn default() -> Self {
        Self {
            candidates_per_round: 50,
            seed: 42,
        }
    }
}

/// Outcome of a generation run. Every row in `test_inputs` is fully
/// assigned and checker-valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub test_inputs: Vec<Combination>,
    /// False iff some valid tuples could not be covered (overconstrained
    /// model); the leftovers are listed in `uncovered`.
    pub complete: bool,
    pub uncovered: Vec<Combination>,
}

pub struct AetgGenerator {
    model: TestModel,
    checker: DynamicConstraintChecker,
    coverage: CoverageMap,
    rng: ChaCha8Rng,
    config: AetgConfig,
}

impl AetgGenerator {
    pub fn new(
        model: &TestModel,
        mut checker: DynamicConstraintChecker,
        config: AetgConfig,
    ) -> Result<Self, GenerationError> {
        let coverage = CoverageMap::new(model, &mut checker)?;
        debug_assert_eq!(coverage.width(), model.number_of_parameters());
        Ok(Self {
            model: model.clone(),
            checker,
            coverage,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        })
    }

    /// Run generation to exhaustion: rows are appended until every
    /// coverable tuple is covered or no candidate can be completed.
    pub fn generate(&mut self) -> Result<GenerationReport, GenerationError> {
        let mut test_inputs = Vec::new();

        while self.coverage.has_uncovered() {
            match self.next_test_case()? {
                Some(row) => {
                    self.coverage.mark_covered(&row);
                    test_inputs.push(row);
                }
                None => {
                    // Overconstrained for the requested strength: surface
                    // the shortfall, never fail.
                    return Ok(GenerationReport {
                        test_inputs,
                        complete: false,
                        uncovered: self.coverage.uncovered().to_vec(),
                    });
                }
            }
        }

        Ok(GenerationReport {
            test_inputs,
            complete: true,
            uncovered: Vec::new(),
        })
    }

    /// Build one round of candidates and return the best, without touching
    /// coverage. `None` means nothing is uncovered or no candidate could be
    /// completed this round.
    pub fn next_test_case(&mut self) -> Result<Option<Combination>, GenerationError> {
        if !self.coverage.has_uncovered() {
            return Ok(None);
        }

        let mut best: Option<(Combination, usize)> = None;
        for i in 0..self.config.candidates_per_round.max(1) {
            let seed = if i == 0 {
                self.coverage.first_uncovered().cloned()
            } else {
                let index = self.rng.gen_range(0..self.coverage.uncovered_count());
                self.coverage.nth_uncovered(index).cloned()
            };
            let seed = match seed {
                Some(tuple) => tuple,
                None => break,
            };

            if let Some(candidate) = self.complete_candidate(seed)? {
                let gain = self.coverage.gain(&candidate);
                // Strict comparison keeps the earliest candidate on ties.
                if best.as_ref().map_or(true, |(_, g)| gain > *g) {
                    best = Some((candidate, gain));
                }
            }
        }

        Ok(best.map(|(row, _)| row))
    }

    /// Complete a seeded partial row parameter-by-parameter in index order.
    /// Returns `None` when some slot has no extension-valid value left.
    fn complete_candidate(
        &mut self,
        mut candidate: Combination,
    ) -> Result<Option<Combination>, GenerationError> {
        for parameter in 0..self.model.number_of_parameters() {
            if candidate.get(parameter).is_some() {
                continue;
            }

            let mut chosen: Option<(u32, usize)> = None;
            for value in 0..self.model.size_of_parameter(parameter) {
                if !self.checker.is_extension_valid(&candidate, parameter, value)? {
                    continue;
                }
                let mut trial = candidate.clone();
                trial.set(parameter, value);
                let gain = self.coverage.gain(&trial);
                // Strictly greater: ties break toward the lowest value.
                if chosen.map_or(true, |(_, g)| gain > g) {
                    chosen = Some((value, gain));
                }
            }

            match chosen {
                Some((value, _)) => candidate.set(parameter, value),
                None => return Ok(None),
            }
        }
        Ok(Some(candidate))
    }

    /// Mark an externally executed row as covered.
    pub fn update_coverage(&mut self, row: &Combination) {
        self.coverage.mark_covered(row);
    }

    /// Learn a forbidden combination and drop the tuples it invalidates.
    pub fn add_forbidden_combination(
        &mut self,
        combination: &Combination,
    ) -> Result<(), GenerationError> {
        self.checker.add_constraint(combination)?;
        if combination.assigned_count() == 0 {
            // Unconditional contradiction: nothing is coverable any more.
            self.coverage.clear();
        } else {
            self.coverage.prune_invalid(&mut self.checker)?;
        }
        Ok(())
    }

    /// A valid full row embedding `sub` while differing from `reference`
    /// wherever the constraints allow, avoiding rows already in `avoid`.
    /// Returns `None` when `sub` itself has become infeasible.
    pub fn select_dissimilar(
        &mut self,
        sub: &Combination,
        reference: &Combination,
        avoid: &[Combination],
    ) -> Result<Option<Combination>, GenerationError> {
        if !self.checker.is_valid(sub)? {
            return Ok(None);
        }

        let width = self.model.number_of_parameters();
        let max_size = self.model.parameter_sizes().iter().copied().max().unwrap_or(1);
        let mut first_built: Option<Combination> = None;

        // Rotate the value preference per attempt to escape `avoid`.
        for attempt in 0..max_size {
            let mut candidate = sub.clone();
            let mut completed = true;

            for parameter in 0..width {
                if candidate.get(parameter).is_some() {
                    continue;
                }
                let size = self.model.size_of_parameter(parameter);
                let reference_value = reference.get(parameter).unwrap_or(0);
                let start = (reference_value + 1 + attempt) % size;

                let mut assigned = false;
                for offset in 0..size {
                    let value = (start + offset) % size;
                    if self.checker.is_extension_valid(&candidate, parameter, value)? {
                        candidate.set(parameter, value);
                        assigned = true;
                        break;
                    }
                }
                if !assigned {
                    completed = false;
                    break;
                }
            }

            if !completed {
                continue;
            }
            if !avoid.contains(&candidate) {
                return Ok(Some(candidate));
            }
            if first_built.is_none() {
                first_built = Some(candidate);
            }
        }

        // Every variation is exhausted; a repeat beats nothing (the caller's
        // verdict cache makes it free).
        Ok(first_built)
    }

    /// A valid full row equal to `base` except at `parameter`. `None` when
    /// no alternative value yields a valid row outside `avoid`.
    pub fn mutated_test_case(
        &mut self,
        parameter: usize,
        base: &Combination,
        avoid: &[Combination],
    ) -> Result<Option<Combination>, GenerationError> {
        let base_value = match base.get(parameter) {
            Some(v) => v,
            None => return Ok(None),
        };
        let size = self.model.size_of_parameter(parameter);

        for offset in 1..size {
            let value = (base_value + offset) % size;
            let mut candidate = base.clone();
            candidate.set(parameter, value);
            if avoid.contains(&candidate) {
                continue;
            }
            if self.checker.is_valid(&candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    pub fn model(&self) -> &TestModel {
        &self.model
    }

    pub fn uncovered_count(&self) -> usize {
        self.coverage.uncovered_count()
    }
}

//! Interleaved characterization.
//!
//! Generation and localization share one generator: a failing row is
//! localized through per-parameter mutants, the resulting candidate is
//! confirmed by embedding it in dissimilar rows, and an accepted fault is
//! learned as a forbidden combination so generation resumes around it.
//! The loop keeps probing the remaining space until the generator is
//! exhausted, so one call can surface several faults.

use lattice_gen::{AetgConfig, AetgGenerator};
use lattice_model::{Combination, TestModel};
use lattice_solver::DynamicConstraintChecker;

use crate::oracle::{Oracle, Verdict};
use crate::{CharacterizeError, Fault};

pub(crate) fn characterize_interleaved(
    model: &TestModel,
    failing: &Combination,
    feedback_checks: usize,
    seed: u64,
    oracle: &mut dyn Oracle,
) -> Result<Vec<Fault>, CharacterizeError> {
    let checker = DynamicConstraintChecker::new(model);
    let config = AetgConfig {
        seed,
        ..AetgConfig::default()
    };
    let mut aetg = AetgGenerator::new(model, checker, config)?;

    let mut faults = Vec::new();
    let mut last_mutations: Vec<Combination> = Vec::new();

    // The supplied failure is characterized first; the caller already
    // confirmed it fails, so the verdict here is a cache hit.
    if let Verdict::Fail { condition } = oracle.execute(failing)? {
        characterize_failure(
            &mut aetg,
            failing,
            condition,
            feedback_checks,
            &mut last_mutations,
            &mut faults,
            oracle,
        )?;
    }

    while let Some(row) = aetg.next_test_case()? {
        match oracle.execute(&row)? {
            Verdict::Pass => aetg.update_coverage(&row),
            Verdict::Fail { condition } => {
                characterize_failure(
                    &mut aetg,
                    &row,
                    condition,
                    feedback_checks,
                    &mut last_mutations,
                    &mut faults,
                    oracle,
                )?;
            }
        }
    }

    Ok(faults)
}

/// Localizes one failing row and learns the accepted combination.
///
/// Localization mutates one parameter at a time; every position on which a
/// passing mutant differs from the failure joins the candidate. Feedback
/// checking then embeds the candidate in dissimilar rows: a passing
/// embedding refutes it and localization restarts with fresh mutants,
/// while `feedback_checks + 1` failing embeddings accept it. Restarts are
/// bounded by the parameter count; when the bound is hit the current
/// candidate is accepted so the generator always makes progress.
fn characterize_failure(
    aetg: &mut AetgGenerator,
    failure: &Combination,
    condition: Option<String>,
    feedback_checks: usize,
    last_mutations: &mut Vec<Combination>,
    faults: &mut Vec<Fault>,
    oracle: &mut dyn Oracle,
) -> Result<(), CharacterizeError> {
    let width = failure.width();
    let max_restarts = width.max(1);
    let mut candidate = Combination::empty(width);

    for _ in 0..=max_restarts {
        candidate = localize(aetg, failure, last_mutations, oracle)?;

        let mut last_feedback: Vec<Combination> = Vec::new();
        let mut failing_rounds = 0usize;
        let confirmed = loop {
            let feedback = match aetg.select_dissimilar(&candidate, failure, &last_feedback)? {
                Some(row) => row,
                // The candidate is already infeasible; no embedding exists.
                None => break true,
            };
            last_feedback.push(feedback.clone());
            match oracle.execute(&feedback)? {
                Verdict::Fail { .. } => {
                    failing_rounds += 1;
                    if failing_rounds > feedback_checks {
                        break true;
                    }
                }
                Verdict::Pass => {
                    aetg.update_coverage(&feedback);
                    break false;
                }
            }
        };

        if confirmed {
            break;
        }
    }

    last_mutations.clear();
    faults.push(Fault {
        combination: candidate.clone(),
        condition,
    });
    aetg.add_forbidden_combination(&candidate)?;
    Ok(())
}

/// One mutant per parameter, avoiding mutants spent on earlier rounds.
/// Positions where every passing mutant differs from the failure are the
/// suspected interaction.
fn localize(
    aetg: &mut AetgGenerator,
    failure: &Combination,
    last_mutations: &mut Vec<Combination>,
    oracle: &mut dyn Oracle,
) -> Result<Combination, CharacterizeError> {
    let width = failure.width();
    let mut mutants = Vec::new();
    for parameter in 0..width {
        if let Some(mutant) = aetg.mutated_test_case(parameter, failure, last_mutations)? {
            mutants.push(mutant);
        }
    }
    last_mutations.extend(mutants.iter().cloned());

    let mut candidate = Combination::empty(width);
    for mutant in &mutants {
        if let Verdict::Pass = oracle.execute(mutant)? {
            aetg.update_coverage(mutant);
            for (parameter, value) in failure.assigned() {
                if mutant.get(parameter) != Some(value) {
                    candidate.set(parameter, value);
                }
            }
        }
    }
    Ok(candidate)
}

//! Linear fixed-variable search.
//!
//! Positions are probed in index order. The probe mutates the position
//! under test together with every position already ruled irrelevant; a
//! probe that still fails clears the position, a passing probe pins it to
//! the interaction. One scan classifies every candidate, so the result is
//! the fixed point of the left-to-right order.

use std::collections::BTreeSet;

use lattice_model::{Combination, TestModel};

use crate::finder::rotated;
use crate::oracle::{Oracle, Verdict};
use crate::CharacterizeError;

pub(crate) fn locate_linear(
    model: &TestModel,
    seed: &Combination,
    tabu: &BTreeSet<usize>,
    oracle: &mut dyn Oracle,
) -> Result<BTreeSet<usize>, CharacterizeError> {
    let mut free = tabu.clone();
    let mut interaction = BTreeSet::new();

    for parameter in 0..model.number_of_parameters() {
        if free.contains(&parameter) {
            continue;
        }
        let mut probe_positions = free.clone();
        probe_positions.insert(parameter);
        match oracle.execute(&rotated(seed, &probe_positions, model))? {
            Verdict::Pass => {
                interaction.insert(parameter);
            }
            Verdict::Fail { .. } => {
                free.insert(parameter);
            }
        }
    }

    Ok(interaction)
}

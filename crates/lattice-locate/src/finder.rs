//! Non-overlapping interaction extraction shared by the wildcard searchers.
//!
//! A single failing input may embed several disjoint failure-inducing
//! interactions. After one interaction is extracted, the seed is re-probed
//! with every found position rotated to its next domain value; a verdict
//! that still fails starts another search with the found positions tabu.

use std::collections::BTreeSet;

use lattice_model::{Combination, TestModel};

use crate::oracle::{Oracle, Verdict};
use crate::{CharacterizeError, Fault};

/// Copy of `seed` with every listed position rotated to the next value of
/// its domain.
pub(crate) fn rotated(
    seed: &Combination,
    positions: &BTreeSet<usize>,
    model: &TestModel,
) -> Combination {
    let mut result = seed.clone();
    for &parameter in positions {
        if let Some(value) = seed.get(parameter) {
            result.set(parameter, (value + 1) % model.size_of_parameter(parameter));
        }
    }
    result
}

/// The seed restricted to the given positions, everything else unset.
pub(crate) fn restrict(seed: &Combination, positions: &BTreeSet<usize>) -> Combination {
    let mut result = Combination::empty(seed.width());
    for &parameter in positions {
        if let Some(value) = seed.get(parameter) {
            result.set(parameter, value);
        }
    }
    result
}

/// Runs `locate` repeatedly over one failing seed until the rotated seed
/// passes, the whole width is tabu, or an interaction comes back empty.
/// An empty interaction is still reported: it marks a failure no single
/// position accounts for.
pub(crate) fn find_non_overlapping<L>(
    model: &TestModel,
    seed: &Combination,
    oracle: &mut dyn Oracle,
    mut locate: L,
) -> Result<Vec<Fault>, CharacterizeError>
where
    L: FnMut(
        &TestModel,
        &Combination,
        &BTreeSet<usize>,
        &mut dyn Oracle,
    ) -> Result<BTreeSet<usize>, CharacterizeError>,
{
    let mut faults = Vec::new();
    let mut tabu: BTreeSet<usize> = BTreeSet::new();
    let mut verdict = oracle.execute(seed)?;

    loop {
        let condition = match &verdict {
            Verdict::Pass => break,
            Verdict::Fail { condition } => condition.clone(),
        };

        let interaction = locate(model, seed, &tabu, oracle)?;
        faults.push(Fault {
            combination: restrict(seed, &interaction),
            condition,
        });
        if interaction.is_empty() {
            break;
        }

        tabu.extend(interaction);
        if tabu.len() == model.number_of_parameters() {
            break;
        }
        verdict = oracle.execute(&rotated(seed, &tabu, model))?;
    }

    Ok(faults)
}

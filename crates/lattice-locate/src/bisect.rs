//! Batch bisection fixed-variable search.
//!
//! Instead of one probe per position, whole batches of candidates are
//! rotated at once. A full-batch probe that still fails ends the search:
//! no remaining candidate belongs to the interaction. Otherwise the batch
//! is halved until a single position remains. When both halves of a split
//! keep the failure alive the batch is ambiguous (overlapping faults) and
//! falls back to single-position probes.

use std::collections::BTreeSet;

use lattice_model::{Combination, TestModel};

use crate::finder::rotated;
use crate::oracle::Oracle;
use crate::CharacterizeError;

pub(crate) fn locate_bisect(
    model: &TestModel,
    seed: &Combination,
    tabu: &BTreeSet<usize>,
    oracle: &mut dyn Oracle,
) -> Result<BTreeSet<usize>, CharacterizeError> {
    let mut free = tabu.clone();
    let mut interaction: BTreeSet<usize> = BTreeSet::new();

    loop {
        let candidates: Vec<usize> = (0..model.number_of_parameters())
            .filter(|p| !free.contains(p) && !interaction.contains(p))
            .collect();
        if candidates.is_empty() {
            return Ok(interaction);
        }

        // Full check: every remaining candidate rotated at once. Still
        // failing means the interaction found so far is all there is.
        let all: BTreeSet<usize> = candidates.iter().chain(free.iter()).copied().collect();
        if oracle.execute(&rotated(seed, &all, model))?.is_failure() {
            return Ok(interaction);
        }

        let mut pool = candidates;
        while pool.len() > 1 {
            // Low half gets the extra element on odd sizes.
            let split = (pool.len() + 1) / 2;
            let (low, high) = pool.split_at(split);

            let low_probe: BTreeSet<usize> = low.iter().chain(free.iter()).copied().collect();
            if !oracle.execute(&rotated(seed, &low_probe, model))?.is_failure() {
                pool = low.to_vec();
                continue;
            }

            // The culprit should sit in the high half; confirm before
            // the low half is discarded.
            let high_probe: BTreeSet<usize> = high.iter().chain(free.iter()).copied().collect();
            if !oracle.execute(&rotated(seed, &high_probe, model))?.is_failure() {
                free.extend(low.iter().copied());
                pool = high.to_vec();
                continue;
            }

            // Both halves kept the failure alive, so the halving invariant
            // does not hold for this batch. Classify each position with a
            // single-position probe instead.
            for &parameter in &pool {
                let mut single = free.clone();
                single.insert(parameter);
                if oracle.execute(&rotated(seed, &single, model))?.is_failure() {
                    free.insert(parameter);
                } else {
                    interaction.insert(parameter);
                }
            }
            pool.clear();
        }

        if let Some(&parameter) = pool.first() {
            interaction.insert(parameter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{OracleError, Verdict};

    struct PairFault;

    impl Oracle for PairFault {
        fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError> {
            if input.get(0) == Some(1) && input.get(1) == Some(1) {
                Ok(Verdict::Fail { condition: None })
            } else {
                Ok(Verdict::Pass)
            }
        }
    }

    #[test]
    fn test_bisection_pins_both_pair_positions() {
        let model = TestModel::new(2, vec![2, 2, 2], vec![], vec![]).unwrap();
        let seed = Combination::full(vec![1, 1, 1]);
        let interaction =
            locate_bisect(&model, &seed, &BTreeSet::new(), &mut PairFault).unwrap();
        assert_eq!(interaction, [0, 1].into_iter().collect());
    }

    #[test]
    fn test_wide_model_single_position_fault() {
        struct SingleFault;
        impl Oracle for SingleFault {
            fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError> {
                if input.get(5) == Some(2) {
                    Ok(Verdict::Fail { condition: None })
                } else {
                    Ok(Verdict::Pass)
                }
            }
        }

        let model = TestModel::new(2, vec![3; 8], vec![], vec![]).unwrap();
        let seed = Combination::full(vec![2; 8]);
        let interaction =
            locate_bisect(&model, &seed, &BTreeSet::new(), &mut SingleFault).unwrap();
        assert_eq!(interaction, [5].into_iter().collect());
    }

    #[test]
    fn test_ambiguous_batch_falls_back_to_single_probes() {
        // Two overlapping pair faults break the halving invariant.
        struct OverlapFault;
        impl Oracle for OverlapFault {
            fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError> {
                let hit = (input.get(0) == Some(1) && input.get(1) == Some(1))
                    || (input.get(2) == Some(1) && input.get(3) == Some(1));
                if hit {
                    Ok(Verdict::Fail { condition: None })
                } else {
                    Ok(Verdict::Pass)
                }
            }
        }

        let model = TestModel::new(2, vec![2, 2, 2, 2], vec![], vec![]).unwrap();
        let seed = Combination::full(vec![1, 1, 1, 1]);
        let interaction =
            locate_bisect(&model, &seed, &BTreeSet::new(), &mut OverlapFault).unwrap();
        // The sequential fallback settles on the second pair; the first is
        // picked up by a later non-overlapping pass.
        assert_eq!(interaction, [2, 3].into_iter().collect());
    }
}

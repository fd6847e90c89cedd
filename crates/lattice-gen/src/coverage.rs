//! The uncovered-tuple bookkeeping behind greedy generation.
//!
//! The map owns the set of valid, not-yet-covered t-tuples. Scoring a
//! candidate against the set is a read-only reduction and runs in parallel;
//! all mutation (covering, pruning) stays on the single owning writer.

use lattice_model::{Combination, TestModel};
use lattice_solver::{CheckerError, DynamicConstraintChecker};
use rayon::prelude::*;

use crate::tuples::{parameter_combinations, value_tuples};

/// True iff `tuple` could still be covered by completing `candidate`:
/// no slot assigned in both disagrees.
fn compatible(candidate: &Combination, tuple: &Combination) -> bool {
    tuple
        .assigned()
        .all(|(p, v)| candidate.get(p).map_or(true, |x| x == v))
}

pub struct CoverageMap {
    width: usize,
    uncovered: Vec<Combination>,
}

impl CoverageMap {
    /// Enumerate the t-way universe of `model` and keep the tuples the
    /// checker accepts. Tuples touching no constrained parameter are valid
    /// by construction and skip the solver.
    pub fn new(
        model: &TestModel,
        checker: &mut DynamicConstraintChecker,
    ) -> Result<Self, CheckerError> {
        let involved = checker.involved_parameters().clone();
        let mut uncovered = Vec::new();

        for params in parameter_combinations(model.number_of_parameters(), model.strength()) {
            let constrained = params.iter().any(|p| involved.contains(p));
            for tuple in value_tuples(model, &params) {
                if !constrained || checker.is_valid(&tuple)? {
                    uncovered.push(tuple);
                }
            }
        }

        Ok(Self {
            width: model.number_of_parameters(),
            uncovered,
        })
    }

    /// Build from an explicit tuple set (test seams and evaluation).
    pub fn from_tuples(width: usize, tuples: Vec<Combination>) -> Self {
        Self {
            width,
            uncovered: tuples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn has_uncovered(&self) -> bool {
        !self.uncovered.is_empty()
    }

    pub fn uncovered_count(&self) -> usize {
        self.uncovered.len()
    }

    pub fn uncovered(&self) -> &[Combination] {
        &self.uncovered
    }

    pub fn first_uncovered(&self) -> Option<&Combination> {
        self.uncovered.first()
    }

    pub fn nth_uncovered(&self, index: usize) -> Option<&Combination> {
        self.uncovered.get(index)
    }

    /// Number of uncovered tuples a candidate could still cover. For a
    /// complete candidate this is exactly the number of tuples it contains;
    /// for a partial one it is the optimistic AETG score.
    pub fn gain(&self, candidate: &Combination) -> usize {
        self.uncovered
            .par_iter()
            .filter(|tuple| compatible(candidate, tuple))
            .count()
    }

    /// Remove every tuple contained in the given row.
    pub fn mark_covered(&mut self, row: &Combination) {
        self.uncovered.retain(|tuple| !row.contains(tuple));
    }

    /// Re-check tuples against a checker that has learned new constraints
    /// and drop the ones that became infeasible. Only tuples touching a
    /// constrained parameter can flip, so the rest skip the solver. Returns
    /// the number pruned.
    ///
    /// A learned contradiction (empty forbidden combination) references no
    /// parameter; callers handling that case must [`CoverageMap::clear`]
    /// instead.
    pub fn prune_invalid(
        &mut self,
        checker: &mut DynamicConstraintChecker,
    ) -> Result<usize, CheckerError> {
        let involved = checker.involved_parameters().clone();
        let before = self.uncovered.len();

        let mut keep = Vec::with_capacity(before);
        for tuple in &self.uncovered {
            let constrained = tuple.assigned().any(|(p, _)| involved.contains(&p));
            keep.push(!constrained || checker.is_valid(tuple)?);
        }

        let old = std::mem::take(&mut self.uncovered);
        for (tuple, keep) in old.into_iter().zip(keep) {
            if keep {
                self.uncovered.push(tuple);
            }
        }
        Ok(before - self.uncovered.len())
    }

    pub fn clear(&mut self) {
        self.uncovered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TestModel {
        TestModel::new(2, vec![3, 3, 3], vec![], vec![]).unwrap()
    }

    fn fixture_map() -> CoverageMap {
        let tuples = vec![
            Combination::from_slots(vec![Some(1), None, None]),
            Combination::from_slots(vec![None, Some(2), None]),
            Combination::from_slots(vec![Some(1), None, Some(2)]),
            Combination::from_slots(vec![None, Some(1), None]),
            Combination::from_slots(vec![Some(1), Some(2), Some(2)]),
            Combination::from_slots(vec![Some(2), Some(2), None]),
        ];
        CoverageMap::from_tuples(3, tuples)
    }

    #[test]
    fn test_initializes_uncovered() {
        let map = fixture_map();
        assert!(map.has_uncovered());
        assert_eq!(map.uncovered_count(), 6);
    }

    #[test]
    fn test_gain_of_partial_candidate_is_optimistic() {
        let map = fixture_map();
        let partial = Combination::from_slots(vec![Some(1), None, Some(1)]);
        assert_eq!(map.gain(&partial), 3);
    }

    #[test]
    fn test_gain_of_complete_candidate_counts_containment() {
        let map = fixture_map();
        assert_eq!(map.gain(&Combination::full(vec![1, 1, 1])), 2);
    }

    #[test]
    fn test_mark_covered_removes_contained_tuples() {
        let mut map = fixture_map();
        map.mark_covered(&Combination::full(vec![1, 2, 1]));
        // Removes [1,-,-], [-,2,-] and [-,1,-]? No: [-,1,-] needs p1=1.
        // Covered: [1,-,-], [-,2,-]. Remaining gain of [1,1,1] drops to 1.
        assert_eq!(map.gain(&Combination::full(vec![1, 1, 1])), 1);
        assert!(map.has_uncovered());
    }

    #[test]
    fn test_checker_filtered_construction() {
        let forbidden = vec![lattice_model::TupleList::new(
            1,
            vec![0],
            vec![vec![1]],
        )];
        let model = TestModel::new(2, vec![3, 3, 3], forbidden, vec![]).unwrap();
        let mut checker = DynamicConstraintChecker::new(&model);
        let map = CoverageMap::new(&model, &mut checker).unwrap();
        // 27 pair-tuples per unconstrained model; p0=1 appears in the pairs
        // {0,1} and {0,2}, 3 value tuples each -> 6 dropped, plus none for
        // the {1,2} pair.
        assert_eq!(map.uncovered_count(), 27 - 6);
        assert!(map
            .uncovered()
            .iter()
            .all(|t| t.get(0) != Some(1)));
    }

    #[test]
    fn test_prune_after_learned_constraint() {
        let model = model();
        let mut checker = DynamicConstraintChecker::new(&model);
        let mut map = CoverageMap::new(&model, &mut checker).unwrap();
        assert_eq!(map.uncovered_count(), 27);

        checker
            .add_constraint(&Combination::from_slots(vec![Some(1), None, None]))
            .unwrap();
        let pruned = map.prune_invalid(&mut checker).unwrap();
        assert_eq!(pruned, 6);
        assert_eq!(map.uncovered_count(), 21);
    }

    #[test]
    fn test_prune_handles_implicitly_blocked_tuples() {
        // Forbidding p0=0 with p1=0 and p0=1 with p2=0 leaves the tuple
        // (p1=0, p2=0) with no feasible completion: p0 has nowhere to go.
        let model = TestModel::new(2, vec![2, 2, 2], vec![], vec![]).unwrap();
        let mut checker = DynamicConstraintChecker::new(&model);
        let mut map = CoverageMap::new(&model, &mut checker).unwrap();

        checker
            .add_constraint(&Combination::from_slots(vec![Some(0), Some(0), None]))
            .unwrap();
        checker
            .add_constraint(&Combination::from_slots(vec![Some(1), None, Some(0)]))
            .unwrap();
        map.prune_invalid(&mut checker).unwrap();

        let blocked = Combination::from_slots(vec![None, Some(0), Some(0)]);
        assert!(!map.uncovered().contains(&blocked));
    }
}

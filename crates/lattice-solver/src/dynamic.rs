//! Dynamic constraint checking with learned forbidden combinations.
//!
//! The dynamic variant accepts additional constraints at runtime — fault
//! localization learns failure-inducing combinations and excludes them from
//! further generation. Constraints only accumulate, never retract, and one
//! instance belongs to exactly one run. Sharing learned state across runs
//! goes through [`DynamicConstraintChecker::snapshot`], which rebuilds a
//! fresh solver instead of aliasing the live one.

use std::collections::BTreeSet;

use lattice_model::{Combination, TestModel};

use crate::checker::{CheckerError, ConstraintChecker};

pub struct DynamicConstraintChecker {
    checker: ConstraintChecker,
    model: TestModel,
    learned: Vec<Combination>,
    involved_parameters: BTreeSet<usize>,
}

impl DynamicConstraintChecker {
    pub fn new(model: &TestModel) -> Self {
        let involved_parameters = model
            .all_tuple_lists()
            .flat_map(|list| list.involved_parameters().iter().copied())
            .collect();

        Self {
            checker: ConstraintChecker::new(model),
            model: model.clone(),
            learned: Vec::new(),
            involved_parameters,
        }
    }

    pub fn is_valid(&mut self, combination: &Combination) -> Result<bool, CheckerError> {
        self.checker.is_valid(combination)
    }

    pub fn is_extension_valid(
        &mut self,
        combination: &Combination,
        parameter: usize,
        value: u32,
    ) -> Result<bool, CheckerError> {
        self.checker.is_extension_valid(combination, parameter, value)
    }

    /// Forbid exactly the given partial assignment from now on.
    ///
    /// A combination with zero assigned slots reports the empty assignment
    /// itself as infeasible: the checker posts an unconditional
    /// contradiction and every later query returns false.
    pub fn add_constraint(&mut self, combination: &Combination) -> Result<(), CheckerError> {
        if combination.assigned_count() == 0 {
            self.checker.post_contradiction();
        } else {
            self.checker.post_forbidden(combination)?;
            for (parameter, _) in combination.assigned() {
                self.involved_parameters.insert(parameter);
            }
        }
        self.learned.push(combination.clone());
        Ok(())
    }

    /// Every parameter referenced by any declared or learned constraint.
    /// Combinations touching none of these are valid without a solver call.
    pub fn involved_parameters(&self) -> &BTreeSet<usize> {
        &self.involved_parameters
    }

    pub fn model(&self) -> &TestModel {
        &self.model
    }

    /// An independent checker with the same declared and learned
    /// constraints. The backend solver is rebuilt from scratch; the clone
    /// shares no mutable state with `self`.
    pub fn snapshot(&self) -> Result<Self, CheckerError> {
        let mut copy = Self::new(&self.model);
        for combination in &self.learned {
            copy.add_constraint(combination)?;
        }
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> TestModel {
        TestModel::new(2, vec![3, 3, 3], vec![], vec![]).unwrap()
    }

    #[test]
    fn test_learned_constraint_excludes_matches() {
        let mut checker = DynamicConstraintChecker::new(&model());
        let forbidden = Combination::from_slots(vec![Some(1), None, None]);
        checker.add_constraint(&forbidden).unwrap();

        assert!(!checker.is_valid(&Combination::full(vec![1, 0, 0])).unwrap());
        assert!(checker.is_valid(&Combination::full(vec![0, 0, 0])).unwrap());
        assert!(!checker
            .is_extension_valid(&Combination::empty(3), 0, 1)
            .unwrap());
    }

    #[test]
    fn test_empty_constraint_poisons_everything() {
        let mut checker = DynamicConstraintChecker::new(&model());
        checker.add_constraint(&Combination::empty(3)).unwrap();

        assert!(!checker.is_valid(&Combination::empty(3)).unwrap());
        assert!(!checker.is_valid(&Combination::full(vec![0, 0, 0])).unwrap());
        assert!(!checker
            .is_extension_valid(&Combination::empty(3), 1, 2)
            .unwrap());
    }

    #[test]
    fn test_involved_parameters_track_learned_constraints() {
        let mut checker = DynamicConstraintChecker::new(&model());
        assert!(checker.involved_parameters().is_empty());

        let c = Combination::from_slots(vec![Some(0), None, Some(2)]);
        checker.add_constraint(&c).unwrap();
        let involved: Vec<usize> = checker.involved_parameters().iter().copied().collect();
        assert_eq!(involved, vec![0, 2]);
    }

    #[test]
    fn test_involved_parameters_seeded_from_declared_lists() {
        let forbidden = vec![lattice_model::TupleList::new(1, vec![1], vec![vec![0]])];
        let model = TestModel::new(1, vec![2, 2], forbidden, vec![]).unwrap();
        let checker = DynamicConstraintChecker::new(&model);
        assert!(checker.involved_parameters().contains(&1));
        assert!(!checker.involved_parameters().contains(&0));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut original = DynamicConstraintChecker::new(&model());
        original
            .add_constraint(&Combination::from_slots(vec![Some(1), None, None]))
            .unwrap();

        let mut copy = original.snapshot().unwrap();
        // Learned state carried over.
        assert!(!copy.is_valid(&Combination::full(vec![1, 0, 0])).unwrap());

        // New constraints on the copy do not leak back.
        copy.add_constraint(&Combination::from_slots(vec![Some(2), None, None]))
            .unwrap();
        assert!(!copy.is_valid(&Combination::full(vec![2, 0, 0])).unwrap());
        assert!(original.is_valid(&Combination::full(vec![2, 0, 0])).unwrap());
    }
}

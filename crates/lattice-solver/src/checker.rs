//! Validity queries over (partial) combinations.
//!
//! The checker owns one solver for its whole lifetime. Queries assert the
//! assigned slots as assumptions and solve; unassigned slots stay free. The
//! constraint set of a static checker never changes after construction —
//! queries still take `&mut self` because the backend solver mutates its
//! search state, and that state is exactly what amortizes a sequence of
//! extension checks sharing a prefix.

use lattice_model::{Combination, TestModel};
use varisat::{solver::Solver, ExtendFormula, Lit};

use crate::encode::EncodedModel;

/// Errors from validity queries.
#[derive(Debug, thiserror::Error)]
pub enum CheckerError {
    #[error("combination has {actual} slots, model has {expected} parameters")]
    WidthMismatch { expected: usize, actual: usize },

    #[error("value {value} is out of range for parameter {parameter}")]
    UnknownValue { parameter: usize, value: u32 },

    #[error("solver error: {0}")]
    Solver(String),
}

/// Static validity oracle built once from a model's declared constraints.
pub struct ConstraintChecker {
    encoded: EncodedModel,
    solver: Solver<'static>,
}

impl ConstraintChecker {
    pub fn new(model: &TestModel) -> Self {
        let encoded = EncodedModel::encode(model);
        let mut solver = Solver::new();

        // Register every variable up front via tautological clauses so the
        // solver tracks them even when no constraint mentions them.
        for var in encoded.all_vars() {
            solver.add_clause(&[var.positive(), var.negative()]);
        }
        for clause in encoded.structural_clauses() {
            solver.add_clause(clause);
        }
        for clause in encoded.constraint_clauses() {
            solver.add_clause(clause);
        }

        Self { encoded, solver }
    }

    /// True iff no forbidden/error tuple matches on all its involved
    /// positions and the assigned subset is extendable to a full valid
    /// assignment. Accepts partial combinations; a combination narrower than
    /// the model leaves the trailing parameters unset.
    pub fn is_valid(&mut self, combination: &Combination) -> Result<bool, CheckerError> {
        let assumptions = self.assumptions_for(combination)?;
        self.solve_under(&assumptions)
    }

    /// True iff assigning `value` at `parameter` keeps `combination`
    /// consistent with all constraints. The extended combination is never
    /// materialized; the extra slot rides along as one more assumption.
    pub fn is_extension_valid(
        &mut self,
        combination: &Combination,
        parameter: usize,
        value: u32,
    ) -> Result<bool, CheckerError> {
        let mut assumptions = self.assumptions_for(combination)?;
        assumptions.push(self.lit_for(parameter, value)?);
        self.solve_under(&assumptions)
    }

    fn lit_for(&self, parameter: usize, value: u32) -> Result<Lit, CheckerError> {
        if parameter >= self.encoded.number_of_parameters() {
            return Err(CheckerError::WidthMismatch {
                expected: self.encoded.number_of_parameters(),
                actual: parameter + 1,
            });
        }
        self.encoded
            .lit(parameter, value)
            .ok_or(CheckerError::UnknownValue { parameter, value })
    }

    fn assumptions_for(&self, combination: &Combination) -> Result<Vec<Lit>, CheckerError> {
        if combination.width() > self.encoded.number_of_parameters() {
            return Err(CheckerError::WidthMismatch {
                expected: self.encoded.number_of_parameters(),
                actual: combination.width(),
            });
        }
        combination
            .assigned()
            .map(|(p, v)| self.lit_for(p, v))
            .collect()
    }

    fn solve_under(&mut self, assumptions: &[Lit]) -> Result<bool, CheckerError> {
        self.solver.assume(assumptions);
        let result = self
            .solver
            .solve()
            .map_err(|e| CheckerError::Solver(e.to_string()));
        // Clear the assumption set so later clause additions and queries
        // start from an unconstrained solver.
        self.solver.assume(&[]);
        result
    }

    /// Post a clause forbidding exactly the assigned slots of `combination`.
    pub(crate) fn post_forbidden(&mut self, combination: &Combination) -> Result<(), CheckerError> {
        let clause: Vec<Lit> = combination
            .assigned()
            .map(|(p, v)| self.lit_for(p, v).map(|l| !l))
            .collect::<Result<_, _>>()?;
        self.solver.add_clause(&clause);
        Ok(())
    }

    /// Post an unconditional contradiction; every later query is false.
    pub(crate) fn post_contradiction(&mut self) {
        self.solver.add_clause(&[]);
    }
}

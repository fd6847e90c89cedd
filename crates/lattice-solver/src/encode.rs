//! One-hot SAT encoding of a test model.
//!
//! Each parameter with domain size d gets d boolean variables, one per
//! value. Structural clauses enforce exactly-one per parameter
//! (at-least-one + pairwise at-most-one). Every declared forbidden/error
//! value tuple compiles into a single negative clause: not all listed
//! positions may simultaneously take the listed values.

use lattice_model::TestModel;
use varisat::{Lit, Var};

/// The SAT view of a model: variable layout plus compiled clauses.
#[derive(Debug, Clone)]
pub struct EncodedModel {
    /// `vars[parameter][value]` is the variable asserting that assignment.
    vars: Vec<Vec<Var>>,
    structural_clauses: Vec<Vec<Lit>>,
    constraint_clauses: Vec<Vec<Lit>>,
}

impl EncodedModel {
    /// Encode a validated model. Variable indices are assigned in parameter
    /// order, then value order, so the layout is deterministic.
    pub fn encode(model: &TestModel) -> Self {
        let mut vars = Vec::with_capacity(model.number_of_parameters());
        let mut structural_clauses = Vec::new();
        let mut next_var = 0usize;

        for &size in model.parameter_sizes() {
            let parameter_vars: Vec<Var> = (0..size)
                .map(|_| {
                    let var = Var::from_index(next_var);
                    next_var += 1;
                    var
                })
                .collect();

            // At-least-one.
            structural_clauses.push(parameter_vars.iter().map(|v| v.positive()).collect());
            // Pairwise at-most-one.
            for i in 0..parameter_vars.len() {
                for j in (i + 1)..parameter_vars.len() {
                    structural_clauses
                        .push(vec![parameter_vars[i].negative(), parameter_vars[j].negative()]);
                }
            }

            vars.push(parameter_vars);
        }

        let mut constraint_clauses = Vec::new();
        for list in model.all_tuple_lists() {
            for tuple in list.tuples() {
                let clause: Vec<Lit> = list
                    .involved_parameters()
                    .iter()
                    .zip(tuple.iter())
                    .map(|(&p, &v)| vars[p][v as usize].negative())
                    .collect();
                constraint_clauses.push(clause);
            }
        }

        Self {
            vars,
            structural_clauses,
            constraint_clauses,
        }
    }

    /// The positive literal for `parameter = value`, if in range.
    pub fn lit(&self, parameter: usize, value: u32) -> Option<Lit> {
        self.vars
            .get(parameter)
            .and_then(|p| p.get(value as usize))
            .map(|v| v.positive())
    }

    pub fn number_of_parameters(&self) -> usize {
        self.vars.len()
    }

    pub fn structural_clauses(&self) -> &[Vec<Lit>] {
        &self.structural_clauses
    }

    pub fn constraint_clauses(&self) -> &[Vec<Lit>] {
        &self.constraint_clauses
    }

    /// All variables of the encoding, in layout order.
    pub fn all_vars(&self) -> impl Iterator<Item = Var> + '_ {
        self.vars.iter().flatten().copied()
    }
}

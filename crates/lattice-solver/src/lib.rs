//! SAT-backed constraint checking for test models.
//!
//! Parameters are encoded one-hot into boolean variables; forbidden and
//! error tuples become negative clauses. Validity queries assume the
//! literals of the assigned slots and ask the solver for satisfiability, so
//! a sequence of queries sharing a prefix reuses the solver's learned state
//! instead of rebuilding a decision problem per call.

pub mod checker;
pub mod dynamic;
pub mod encode;

pub use checker::{CheckerError, ConstraintChecker};
pub use dynamic::DynamicConstraintChecker;

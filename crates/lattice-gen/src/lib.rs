//! Covering-array generation.
//!
//! Greedy AETG-style construction over a SAT-checked tuple universe: every
//! round builds a bounded number of candidate rows, each seeded from an
//! uncovered t-tuple and completed value-by-value toward maximal coverage
//! gain, and keeps the best. Overconstrained models degrade to a
//! coverage-incomplete report instead of an error.

pub mod aetg;
pub mod coverage;
pub mod tuples;

pub use aetg::{AetgConfig, AetgGenerator, GenerationError, GenerationReport};
pub use coverage::CoverageMap;

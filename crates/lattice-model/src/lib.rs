//! Data model for combinatorial interaction testing.
//!
//! A [`TestModel`] describes the system under test as a list of finite
//! parameter domains, the interaction strength to cover, and the declared
//! forbidden/error tuples. A [`Combination`] is a (possibly partial)
//! assignment of one value per parameter. Both are plain immutable data;
//! constraint checking, generation and fault localization live in the
//! downstream crates.

pub mod combination;
pub mod model;

pub use combination::Combination;
pub use model::{ModelError, TestModel, TupleList};

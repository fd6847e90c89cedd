//! The immutable test model.
//!
//! Validation happens eagerly in [`TestModel::new`]: a malformed model would
//! corrupt every downstream guarantee, so it is rejected before any checker
//! or generator sees it.

use serde::{Deserialize, Serialize};

/// Structural problems in a [`TestModel`]. Detected at construction.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model has no parameters")]
    NoParameters,

    #[error("parameter {parameter} has an empty domain")]
    EmptyParameterDomain { parameter: usize },

    #[error("strength {strength} exceeds the number of parameters ({parameters})")]
    StrengthTooLarge { strength: usize, parameters: usize },

    #[error("tuple list {list_id} references parameter {parameter} more than once")]
    DuplicateParameter { list_id: u32, parameter: usize },

    #[error("tuple list {list_id} references parameter {parameter}, model has {parameters}")]
    ParameterOutOfRange {
        list_id: u32,
        parameter: usize,
        parameters: usize,
    },

    #[error("tuple list {list_id} has a tuple of length {actual}, expected {expected}")]
    TupleLengthMismatch {
        list_id: u32,
        expected: usize,
        actual: usize,
    },

    #[error("tuple list {list_id} assigns value {value} to parameter {parameter} (domain size {size})")]
    ValueOutOfRange {
        list_id: u32,
        parameter: usize,
        value: u32,
        size: u32,
    },
}

/// A named set of parameter positions plus disallowed value tuples over them.
///
/// Forbidden and error tuple lists share this shape; the model keeps them in
/// separate collections so consumers can tell "infeasible" from "known
/// faulty region" — validity checking treats both as exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleList {
    id: u32,
    involved_parameters: Vec<usize>,
    tuples: Vec<Vec<u32>>,
}

impl TupleList {
    pub fn new(id: u32, involved_parameters: Vec<usize>, tuples: Vec<Vec<u32>>) -> Self {
        Self {
            id,
            involved_parameters,
            tuples,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn involved_parameters(&self) -> &[usize] {
        &self.involved_parameters
    }

    pub fn tuples(&self) -> &[Vec<u32>] {
        &self.tuples
    }
}

/// Immutable description of the system under test: parameter domain sizes,
/// interaction strength, and declared constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestModel {
    strength: usize,
    parameter_sizes: Vec<u32>,
    forbidden_tuples: Vec<TupleList>,
    error_tuples: Vec<TupleList>,
}

impl TestModel {
    /// Build and validate a model. Every structural defect fails fast here.
    pub fn new(
        strength: usize,
        parameter_sizes: Vec<u32>,
        forbidden_tuples: Vec<TupleList>,
        error_tuples: Vec<TupleList>,
    ) -> Result<Self, ModelError> {
        if parameter_sizes.is_empty() {
            return Err(ModelError::NoParameters);
        }
        for (parameter, &size) in parameter_sizes.iter().enumerate() {
            if size == 0 {
                return Err(ModelError::EmptyParameterDomain { parameter });
            }
        }
        if strength > parameter_sizes.len() {
            return Err(ModelError::StrengthTooLarge {
                strength,
                parameters: parameter_sizes.len(),
            });
        }
        for list in forbidden_tuples.iter().chain(error_tuples.iter()) {
            validate_tuple_list(list, &parameter_sizes)?;
        }

        Ok(Self {
            strength,
            parameter_sizes,
            forbidden_tuples,
            error_tuples,
        })
    }

    pub fn strength(&self) -> usize {
        self.strength
    }

    pub fn number_of_parameters(&self) -> usize {
        self.parameter_sizes.len()
    }

    pub fn parameter_sizes(&self) -> &[u32] {
        &self.parameter_sizes
    }

    pub fn size_of_parameter(&self, parameter: usize) -> u32 {
        self.parameter_sizes[parameter]
    }

    pub fn forbidden_tuples(&self) -> &[TupleList] {
        &self.forbidden_tuples
    }

    pub fn error_tuples(&self) -> &[TupleList] {
        &self.error_tuples
    }

    /// All declared tuple lists, forbidden first.
    pub fn all_tuple_lists(&self) -> impl Iterator<Item = &TupleList> {
        self.forbidden_tuples.iter().chain(self.error_tuples.iter())
    }
}

fn validate_tuple_list(list: &TupleList, parameter_sizes: &[u32]) -> Result<(), ModelError> {
    let involved = list.involved_parameters();
    for (i, &parameter) in involved.iter().enumerate() {
        if parameter >= parameter_sizes.len() {
            return Err(ModelError::ParameterOutOfRange {
                list_id: list.id(),
                parameter,
                parameters: parameter_sizes.len(),
            });
        }
        if involved[..i].contains(&parameter) {
            return Err(ModelError::DuplicateParameter {
                list_id: list.id(),
                parameter,
            });
        }
    }
    for tuple in list.tuples() {
        if tuple.len() != involved.len() {
            return Err(ModelError::TupleLengthMismatch {
                list_id: list.id(),
                expected: involved.len(),
                actual: tuple.len(),
            });
        }
        for (&parameter, &value) in involved.iter().zip(tuple.iter()) {
            let size = parameter_sizes[parameter];
            if value >= size {
                return Err(ModelError::ValueOutOfRange {
                    list_id: list.id(),
                    parameter,
                    value,
                    size,
                });
            }
        }
    }
    Ok(())
}

//! Enumeration of the t-way tuple universe.
//!
//! Both enumerations are lexicographic so the generator's tie-breaks stay
//! deterministic across runs.

use lattice_model::{Combination, TestModel};

/// All size-`strength` parameter index sets, in lexicographic order.
/// Strength 0 carries no coverage obligation and yields nothing.
pub fn parameter_combinations(parameters: usize, strength: usize) -> Vec<Vec<usize>> {
    if strength == 0 || strength > parameters {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut current: Vec<usize> = (0..strength).collect();
    loop {
        result.push(current.clone());

        // Advance the rightmost index that still has headroom.
        let mut i = strength;
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            if current[i] < parameters - (strength - i) {
                break;
            }
        }
        current[i] += 1;
        for j in (i + 1)..strength {
            current[j] = current[j - 1] + 1;
        }
    }
}

/// The cartesian product of the selected parameters' domains, emitted as
/// model-width partial combinations in lexicographic value order.
pub fn value_tuples(model: &TestModel, parameters: &[usize]) -> Vec<Combination> {
    let width = model.number_of_parameters();
    let mut result = Vec::new();
    let mut values = vec![0u32; parameters.len()];

    loop {
        let mut tuple = Combination::empty(width);
        for (&p, &v) in parameters.iter().zip(values.iter()) {
            tuple.set(p, v);
        }
        result.push(tuple);

        // Odometer increment over the selected domains.
        let mut i = parameters.len();
        loop {
            if i == 0 {
                return result;
            }
            i -= 1;
            values[i] += 1;
            if values[i] < model.size_of_parameter(parameters[i]) {
                break;
            }
            values[i] = 0;
        }
    }
}

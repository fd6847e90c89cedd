//! Plan construction: one covering-array generation run frozen into an
//! executable test plan.

use lattice_gen::{AetgConfig, AetgGenerator};
use lattice_locate::CharacterizationConfig;
use lattice_model::{Combination, TestModel};
use lattice_solver::DynamicConstraintChecker;
use serde::{Deserialize, Serialize};

use crate::EngineError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanConfig {
    pub generation: AetgConfig,
    pub characterization: CharacterizationConfig,
}

/// An ordered suite of complete, constraint-valid test inputs together
/// with the characterization setup to apply when one of them fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPlan {
    pub test_inputs: Vec<Combination>,
    /// False when the model was too constrained to cover every tuple.
    pub complete: bool,
    pub characterization: CharacterizationConfig,
}

pub fn plan(model: &TestModel, config: &PlanConfig) -> Result<TestPlan, EngineError> {
    let checker = DynamicConstraintChecker::new(model);
    let mut generator = AetgGenerator::new(model, checker, config.generation.clone())?;
    let report = generator.generate()?;

    Ok(TestPlan {
        test_inputs: report.test_inputs,
        complete: report.complete,
        characterization: config.characterization.clone(),
    })
}

//! Plan execution: run every input against the oracle, then characterize
//! each failure with the plan's configured strategy.

use std::collections::BTreeMap;

use lattice_locate::{characterize, Fault, Oracle, Verdict};
use lattice_model::{Combination, TestModel};
use serde::{Deserialize, Serialize};

use crate::plan::TestPlan;
use crate::EngineError;

pub struct Session {
    model: TestModel,
    plan: TestPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub executed: usize,
    pub passed: usize,
    pub failed: Vec<Combination>,
    /// Deduplicated across failing inputs: two failures caused by the same
    /// combination yield one fault.
    pub faults: Vec<Fault>,
}

impl SessionReport {
    pub fn group_by_condition(&self) -> BTreeMap<Option<String>, Vec<Combination>> {
        let mut groups: BTreeMap<Option<String>, Vec<Combination>> = BTreeMap::new();
        for fault in &self.faults {
            groups
                .entry(fault.condition.clone())
                .or_default()
                .push(fault.combination.clone());
        }
        groups
    }
}

impl Session {
    pub fn new(model: &TestModel, plan: TestPlan) -> Self {
        Self {
            model: model.clone(),
            plan,
        }
    }

    /// Executes the plan in order. Oracle transport errors abort the run;
    /// test failures are collected and characterized afterwards.
    pub fn run<O: Oracle>(&self, oracle: &mut O) -> Result<SessionReport, EngineError> {
        let mut passed = 0usize;
        let mut failed = Vec::new();

        for row in &self.plan.test_inputs {
            match oracle.execute(row)? {
                Verdict::Pass => passed += 1,
                Verdict::Fail { .. } => failed.push(row.clone()),
            }
        }

        let mut faults: Vec<Fault> = Vec::new();
        for row in &failed {
            let result = characterize(&self.plan.characterization, &self.model, row, oracle)?;
            for fault in result.faults {
                if !faults.contains(&fault) {
                    faults.push(fault);
                }
            }
        }

        Ok(SessionReport {
            executed: self.plan.test_inputs.len(),
            passed,
            failed,
            faults,
        })
    }
}

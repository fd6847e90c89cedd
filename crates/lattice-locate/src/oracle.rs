//! Executor boundary: verdicts for complete test inputs come from an
//! external system behind the [`Oracle`] trait.

use std::collections::HashMap;

use lattice_model::Combination;
use serde::{Deserialize, Serialize};

/// Outcome of executing one test input. A failure optionally names the
/// violated condition so distinct causes can be grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Pass,
    Fail { condition: Option<String> },
}

impl Verdict {
    pub fn is_failure(&self) -> bool {
        matches!(self, Verdict::Fail { .. })
    }

    pub fn condition(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail { condition } => condition.as_deref(),
        }
    }
}

/// Transport and executor failures. These abort characterization; a flaky
/// system under test is the caller's problem, not retried here.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("execution timed out after {seconds}s")]
    Timeout { seconds: u64 },
    #[error("executor crashed: {0}")]
    Crashed(String),
    #[error("executor protocol violation: {0}")]
    Protocol(String),
}

/// Executes test inputs against the system under test. Implementations may
/// be stateful; calls are strictly sequential.
pub trait Oracle {
    fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError> {
        (**self).execute(input)
    }
}

/// Verdict cache over an oracle. Characterization revisits inputs freely;
/// only the first query per distinct input reaches the backend. Errors are
/// not cached, so a failed transport call is retried on the next query.
pub struct CachedOracle<O> {
    inner: O,
    cache: HashMap<Combination, Verdict>,
    queries: u64,
    executions: u64,
}

impl<O: Oracle> CachedOracle<O> {
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            queries: 0,
            executions: 0,
        }
    }

    /// Total queries answered, cache hits included.
    pub fn queries(&self) -> u64 {
        self.queries
    }

    /// Queries that actually reached the backend.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Oracle> Oracle for CachedOracle<O> {
    fn execute(&mut self, input: &Combination) -> Result<Verdict, OracleError> {
        self.queries += 1;
        if let Some(verdict) = self.cache.get(input) {
            return Ok(verdict.clone());
        }
        self.executions += 1;
        let verdict = self.inner.execute(input)?;
        self.cache.insert(input.clone(), verdict.clone());
        Ok(verdict)
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use cryptorun_orchestrator::{CandidateDataSource, CandidateSnapshot};
use cryptorun_schemas::{Candidate, CoreError};

use crate::fixtures::sample_candidate_snapshot;

/// A `CandidateDataSource` backed by an in-memory map, for exercising the
/// orchestrator's worker-pool and barrier logic without any provider stack.
///
/// Unregistered symbols fall back to [`sample_candidate_snapshot`] with
/// `momentum_core = 0.0`, so a test only needs to register the candidates it
/// cares about deviating from the baseline.
pub struct InMemoryCandidateDataSource {
    responses: Mutex<HashMap<String, Result<CandidateSnapshot, CoreError>>>,
}

impl InMemoryCandidateDataSource {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_snapshot(self, symbol: impl Into<String>, snapshot: CandidateSnapshot) -> Self {
        self.responses.lock().unwrap().insert(symbol.into(), Ok(snapshot));
        self
    }

    pub fn with_error(self, symbol: impl Into<String>, error: CoreError) -> Self {
        self.responses.lock().unwrap().insert(symbol.into(), Err(error));
        self
    }
}

impl Default for InMemoryCandidateDataSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandidateDataSource for InMemoryCandidateDataSource {
    async fn fetch_snapshot(&self, candidate: &Candidate) -> Result<CandidateSnapshot, CoreError> {
        let registered = self.responses.lock().unwrap().get(&candidate.symbol).cloned();
        registered.unwrap_or_else(|| Ok(sample_candidate_snapshot(0.0)))
    }
}

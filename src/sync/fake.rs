//! In-memory [`ProcessApi`] for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{ApiError, HealthStatus, ProcessApi};
use crate::models::{Action, QueryState, SortField, SortOrder, Snapshot};

use super::QuerySource;

#[derive(Default)]
struct FakeState {
    reads: Vec<QueryState>,
    writes: Vec<(Action, String)>,
    /// Delay (ms) and result for upcoming reads; empty means instant empty snapshot.
    read_script: VecDeque<(u64, Result<Snapshot, u16>)>,
    write_status: Option<u16>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn script_read(&self, delay_ms: u64, result: Result<Snapshot, u16>) {
        self.state.lock().unwrap().read_script.push_back((delay_ms, result));
    }

    pub fn fail_writes_with(&self, code: u16) {
        self.state.lock().unwrap().write_status = Some(code);
    }

    pub fn read_count(&self) -> usize {
        self.state.lock().unwrap().reads.len()
    }

    pub fn reads(&self) -> Vec<QueryState> {
        self.state.lock().unwrap().reads.clone()
    }

    pub fn writes(&self) -> Vec<(Action, String)> {
        self.state.lock().unwrap().writes.clone()
    }
}

impl ProcessApi for FakeApi {
    async fn list_processes(&self, query: &QueryState) -> Result<Snapshot, ApiError> {
        let (delay, result) = {
            let mut s = self.state.lock().unwrap();
            s.reads.push(query.clone());
            s.read_script
                .pop_front()
                .unwrap_or((0, Ok(Snapshot::default())))
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        result.map_err(|code| ApiError::Status { code, message: None })
    }

    async fn perform(&self, action: Action, token: &str) -> Result<(), ApiError> {
        let status = {
            let mut s = self.state.lock().unwrap();
            s.writes.push((action, token.to_string()));
            s.write_status
        };
        match status {
            Some(code) => Err(ApiError::Status { code, message: None }),
            None => Ok(()),
        }
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            time: None,
        })
    }
}

/// Fixed query controls.
pub struct StaticSource {
    pub query: QueryState,
}

impl StaticSource {
    pub fn new(token: &str) -> Self {
        Self {
            query: QueryState {
                filter: String::new(),
                sort: SortField::Cpu,
                order: SortOrder::Desc,
                token: token.to_string(),
            },
        }
    }
}

impl QuerySource for StaticSource {
    fn current_query(&self) -> QueryState {
        self.query.clone()
    }
}

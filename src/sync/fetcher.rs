use tokio::sync::mpsc;

use crate::api::{ApiError, ProcessApi, ReadFailure};
use crate::models::{ProcessRecord, QueryState, Snapshot};

use super::sequencer::ReadSequencer;
use super::SyncEvent;

/// Why a read was issued. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadReason {
    Startup,
    Manual,
    Edit,
    Tick,
    Reconcile,
}

/// What a completed read means for the table.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Rows(Vec<ProcessRecord>),
    Failed(ReadFailure),
    /// A newer read was already applied; this one is dropped.
    Stale,
}

/// Issues reads on spawned tasks and filters their completions.
#[derive(Debug, Default)]
pub struct Fetcher {
    sequencer: ReadSequencer,
    in_flight: usize,
}

impl Fetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads issued but not yet completed.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a read for `query`. The result comes back on `tx` as
    /// [`SyncEvent::ReadDone`] carrying the returned sequence number.
    pub fn issue<A: ProcessApi>(
        &mut self,
        api: &A,
        query: QueryState,
        reason: ReadReason,
        tx: &mpsc::UnboundedSender<SyncEvent>,
    ) -> u64 {
        let seq = self.sequencer.issue();
        self.in_flight += 1;
        tracing::debug!(seq, ?reason, filter = %query.filter, sort = %query.sort, order = %query.order, "read issued");

        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = api.list_processes(&query).await;
            let _ = tx.send(SyncEvent::ReadDone { seq, result });
        });
        seq
    }

    /// Resolve a completion against the sequencer.
    pub fn complete(&mut self, seq: u64, result: Result<Snapshot, ApiError>) -> ReadOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if !self.sequencer.accept(seq) {
            tracing::debug!(seq, last_applied = self.sequencer.last_applied(), "stale read discarded");
            return ReadOutcome::Stale;
        }

        match result {
            Ok(snapshot) => {
                tracing::debug!(seq, rows = snapshot.items.len(), "read applied");
                ReadOutcome::Rows(snapshot.items)
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "read failed");
                ReadOutcome::Failed(ReadFailure::from(&e))
            }
        }
    }
}

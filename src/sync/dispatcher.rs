use tokio::sync::mpsc;

use crate::api::ProcessApi;
use crate::models::Action;

use super::SyncEvent;

/// Fires mutating calls. Nothing is queued or deduplicated: every call to
/// [`dispatch`](Self::dispatch) is an independent request whose completion
/// arrives as [`SyncEvent::ActionDone`].
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    in_flight: usize,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch<A: ProcessApi>(
        &mut self,
        api: &A,
        action: Action,
        token: String,
        tx: &mpsc::UnboundedSender<SyncEvent>,
    ) {
        self.in_flight += 1;
        tracing::info!(pid = action.pid(), action = %action.label(), "action dispatched");

        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let result = api.perform(action, &token).await;
            let _ = tx.send(SyncEvent::ActionDone { action, result });
        });
    }

    pub fn complete(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }
}

//! Client-side synchronization loop.
//!
//! Reads and writes run on spawned tasks and report back over one channel.
//! The event loop feeds each [`SyncEvent`] to [`SyncEngine::handle`], which
//! decides what the UI should apply:
//!
//! - timer ticks issue a read (only while auto-refresh is running)
//! - read completions pass through the sequencer, so an older response can
//!   never overwrite a newer one
//! - every write completion, success or failure, issues exactly one
//!   reconciliation read
//!
//! Query parameters and the token are pulled from a [`QuerySource`] at the
//! moment each request is built.

mod dispatcher;
#[cfg(test)]
pub(crate) mod fake;
mod fetcher;
mod poll;
mod sequencer;

use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{ApiError, HealthStatus, ProcessApi};
use crate::models::{Action, QueryState, Snapshot};

use dispatcher::ActionDispatcher;
use fetcher::Fetcher;
use poll::PollController;

pub use fetcher::{ReadOutcome, ReadReason};

/// Completion or timer events delivered to the event loop.
#[derive(Debug)]
pub enum SyncEvent {
    /// Timer tick, tagged with the generation of the timer that sent it.
    Tick(u64),
    ReadDone {
        seq: u64,
        result: Result<Snapshot, ApiError>,
    },
    ActionDone {
        action: Action,
        result: Result<(), ApiError>,
    },
    HealthDone(Result<HealthStatus, ApiError>),
}

/// Live view of the input controls.
pub trait QuerySource {
    /// Filter, sort, order and token as they are right now.
    fn current_query(&self) -> QueryState;

    /// Token as it is right now.
    fn current_token(&self) -> String {
        self.current_query().token
    }
}

/// What the UI should do in response to one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// A timer tick issued the read with this sequence number.
    ReadIssued(u64),
    /// A read completed.
    Read(ReadOutcome),
    ActionSucceeded(Action),
    ActionFailed {
        action: Action,
        status: Option<u16>,
        error: String,
    },
    Health(Result<HealthStatus, String>),
    /// A tick that was already queued when auto-refresh stopped.
    Ignored,
}

/// Owns the API handle, the event channel and the three request sources.
pub struct SyncEngine<A: ProcessApi> {
    api: A,
    tx: mpsc::UnboundedSender<SyncEvent>,
    rx: mpsc::UnboundedReceiver<SyncEvent>,
    fetcher: Fetcher,
    dispatcher: ActionDispatcher,
    poll: PollController,
}

impl<A: ProcessApi> SyncEngine<A> {
    pub fn new(api: A, poll_period: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            tx,
            rx,
            fetcher: Fetcher::new(),
            dispatcher: ActionDispatcher::new(),
            poll: PollController::new(poll_period),
        }
    }

    // ── Request sources ──────────────────────────────────────────

    /// Issue one read built from the source's current controls.
    pub fn refresh(&mut self, source: &impl QuerySource, reason: ReadReason) -> u64 {
        self.fetcher
            .issue(&self.api, source.current_query(), reason, &self.tx)
    }

    /// Fire one write. Its completion triggers the reconciliation read.
    pub fn dispatch(&mut self, action: Action, source: &impl QuerySource) {
        let token = source.current_token();
        self.dispatcher.dispatch(&self.api, action, token, &self.tx);
    }

    pub fn check_health(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(SyncEvent::HealthDone(api.health().await));
        });
    }

    // ── Auto-refresh ─────────────────────────────────────────────

    pub fn start_polling(&mut self) {
        self.poll.start(self.tx.clone());
    }

    pub fn stop_polling(&mut self) {
        self.poll.stop();
    }

    /// Returns the new running state.
    pub fn toggle_polling(&mut self) -> bool {
        self.poll.toggle(self.tx.clone())
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_running()
    }

    pub fn poll_period(&self) -> Duration {
        self.poll.period()
    }

    // ── Progress ─────────────────────────────────────────────────

    pub fn reads_in_flight(&self) -> usize {
        self.fetcher.in_flight()
    }

    pub fn actions_in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }

    // ── Event handling ───────────────────────────────────────────

    /// Wait for the next event. Never returns `None` while the engine lives,
    /// since it holds a sender itself.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<SyncEvent> {
        self.rx.try_recv().ok()
    }

    pub fn handle(&mut self, event: SyncEvent, source: &impl QuerySource) -> Update {
        match event {
            SyncEvent::Tick(generation) => {
                if !self.poll.is_current(generation) {
                    tracing::debug!(generation, "tick from a retired timer ignored");
                    return Update::Ignored;
                }
                Update::ReadIssued(self.refresh(source, ReadReason::Tick))
            }
            SyncEvent::ReadDone { seq, result } => Update::Read(self.fetcher.complete(seq, result)),
            SyncEvent::ActionDone { action, result } => {
                self.dispatcher.complete();
                self.refresh(source, ReadReason::Reconcile);
                match result {
                    Ok(()) => {
                        tracing::info!(pid = action.pid(), action = %action.label(), "action succeeded");
                        Update::ActionSucceeded(action)
                    }
                    Err(e) => {
                        tracing::warn!(pid = action.pid(), action = %action.label(), error = %e, "action failed");
                        Update::ActionFailed {
                            action,
                            status: e.status_code(),
                            error: e.to_string(),
                        }
                    }
                }
            }
            SyncEvent::HealthDone(result) => Update::Health(result.map_err(|e| e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeApi, StaticSource};
    use super::*;
    use crate::models::{ProcessRecord, Signal};

    const PERIOD: Duration = Duration::from_millis(3000);

    fn new_engine(api: &FakeApi) -> SyncEngine<FakeApi> {
        SyncEngine::new(api.clone(), PERIOD)
    }

    async fn next_update(engine: &mut SyncEngine<FakeApi>, source: &StaticSource) -> Update {
        let ev = engine.next_event().await.unwrap();
        engine.handle(ev, source)
    }

    fn rows(pids: &[u32]) -> Snapshot {
        Snapshot {
            items: pids
                .iter()
                .map(|&pid| ProcessRecord {
                    pid,
                    ..Default::default()
                })
                .collect(),
            count: None,
        }
    }

    /// Let spawned tasks finish, then report whether anything else arrived.
    async fn drained(engine: &mut SyncEngine<FakeApi>) -> bool {
        tokio::time::sleep(Duration::from_millis(50)).await;
        engine.try_next_event().is_none()
    }

    #[tokio::test(start_paused = true)]
    async fn successful_write_issues_exactly_one_read() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.dispatch(Action::Signal { pid: 10, signal: Signal::Term }, &source);
        let update = next_update(&mut engine, &source).await;
        assert_eq!(update, Update::ActionSucceeded(Action::Signal { pid: 10, signal: Signal::Term }));

        assert!(matches!(next_update(&mut engine, &source).await, Update::Read(ReadOutcome::Rows(_))));
        assert!(drained(&mut engine).await);
        assert_eq!(api.read_count(), 1);
        assert_eq!(api.writes(), vec![(Action::Signal { pid: 10, signal: Signal::Term }, "tok".to_string())]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_write_still_issues_exactly_one_read() {
        let api = FakeApi::default();
        api.fail_writes_with(403);
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.dispatch(Action::Restart { pid: 77 }, &source);
        match next_update(&mut engine, &source).await {
            Update::ActionFailed { action, status, .. } => {
                assert_eq!(action, Action::Restart { pid: 77 });
                assert_eq!(status, Some(403));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        next_update(&mut engine, &source).await;
        assert!(drained(&mut engine).await);
        assert_eq!(api.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_activations_are_not_deduplicated() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        let action = Action::Signal { pid: 3, signal: Signal::Kill };
        engine.dispatch(action, &source);
        engine.dispatch(action, &source);
        assert_eq!(engine.actions_in_flight(), 2);

        for _ in 0..4 {
            next_update(&mut engine, &source).await;
        }
        assert!(drained(&mut engine).await);
        assert_eq!(api.writes().len(), 2);
        assert_eq!(api.read_count(), 2);
        assert_eq!(engine.actions_in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn renice_sends_value_from_action() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.dispatch(Action::Renice { pid: 8, nice: 0 }, &source);
        next_update(&mut engine, &source).await;
        assert_eq!(api.writes()[0].0, Action::Renice { pid: 8, nice: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn older_read_completing_last_is_discarded() {
        let api = FakeApi::default();
        api.script_read(500, Ok(rows(&[1])));
        api.script_read(100, Ok(rows(&[2])));
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        let first = engine.refresh(&source, ReadReason::Edit);
        let second = engine.refresh(&source, ReadReason::Edit);
        assert!(second > first);
        assert_eq!(engine.reads_in_flight(), 2);

        match next_update(&mut engine, &source).await {
            Update::Read(ReadOutcome::Rows(r)) => assert_eq!(r[0].pid, 2),
            other => panic!("expected newer rows first, got {:?}", other),
        }
        assert_eq!(next_update(&mut engine, &source).await, Update::Read(ReadOutcome::Stale));
        assert_eq!(engine.reads_in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn read_error_status_is_surfaced() {
        let api = FakeApi::default();
        api.script_read(0, Err(500));
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.refresh(&source, ReadReason::Manual);
        match next_update(&mut engine, &source).await {
            Update::Read(ReadOutcome::Failed(f)) => assert_eq!(f.status, Some(500)),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_issue_reads_while_polling() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.start_polling();
        assert!(matches!(next_update(&mut engine, &source).await, Update::ReadIssued(_)));
        assert!(matches!(next_update(&mut engine, &source).await, Update::Read(_)));
        assert_eq!(api.read_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_reads_do_not_stop_polling() {
        let api = FakeApi::default();
        api.script_read(0, Err(503));
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.start_polling();
        next_update(&mut engine, &source).await; // tick
        assert!(matches!(
            next_update(&mut engine, &source).await,
            Update::Read(ReadOutcome::Failed(_))
        ));
        assert!(engine.is_polling());
        assert!(matches!(next_update(&mut engine, &source).await, Update::ReadIssued(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_polling_stops_timer_reads() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.start_polling();
        next_update(&mut engine, &source).await; // tick
        next_update(&mut engine, &source).await; // its read
        assert!(!engine.toggle_polling());

        tokio::time::sleep(PERIOD * 5).await;
        assert!(engine.try_next_event().is_none());
        assert_eq!(api.read_count(), 1);

        // manual reads are unaffected
        engine.refresh(&source, ReadReason::Manual);
        next_update(&mut engine, &source).await;
        assert_eq!(api.read_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_tick_after_stop_is_ignored() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.start_polling();
        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        engine.stop_polling();

        let ev = engine.try_next_event().unwrap();
        assert_eq!(engine.handle(ev, &source), Update::Ignored);
        assert!(drained(&mut engine).await);
        assert_eq!(api.read_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_tick_after_quick_toggle_is_ignored() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.start_polling();
        tokio::time::sleep(PERIOD + Duration::from_millis(10)).await;
        // Off and straight back on while the old tick is still queued
        assert!(!engine.toggle_polling());
        assert!(engine.toggle_polling());

        let ev = engine.try_next_event().unwrap();
        assert_eq!(engine.handle(ev, &source), Update::Ignored);
        assert!(drained(&mut engine).await);
        assert_eq!(api.read_count(), 0);

        // The new timer still ticks one period after it started
        tokio::time::sleep(PERIOD).await;
        assert!(matches!(next_update(&mut engine, &source).await, Update::ReadIssued(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn query_is_captured_when_the_request_is_built() {
        let api = FakeApi::default();
        let mut source = StaticSource::new("first");
        let mut engine = new_engine(&api);

        engine.refresh(&source, ReadReason::Edit);
        source.query.token = "second".to_string();
        source.query.filter = "ssh".to_string();
        engine.refresh(&source, ReadReason::Edit);
        next_update(&mut engine, &source).await;
        next_update(&mut engine, &source).await;

        let reads = api.reads();
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[0].token, "first");
        assert_eq!(reads[0].filter, "");
        assert_eq!(reads[1].token, "second");
        assert_eq!(reads[1].filter, "ssh");
    }

    #[tokio::test(start_paused = true)]
    async fn health_result_is_forwarded() {
        let api = FakeApi::default();
        let source = StaticSource::new("tok");
        let mut engine = new_engine(&api);

        engine.check_health();
        match next_update(&mut engine, &source).await {
            Update::Health(Ok(h)) => assert_eq!(h.status, "ok"),
            other => panic!("expected health, got {:?}", other),
        }
    }
}

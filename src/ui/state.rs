use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use chrono::{DateTime, Local};

use crate::api::{Credentials, HealthStatus};
use crate::constants::*;
use crate::models::{Action, ProcessRecord, QueryState, Signal, SortField, SortOrder, SIGNAL_LIST};
use crate::sync::{QuerySource, ReadOutcome};
use crate::utils::parse_nice;

use super::table::TableView;
use super::theme::Theme;

/// Which text input, if any, receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Filter,
    Token,
    /// Editing the nice value of one pid.
    Nice(u32),
}

/// A failed action. While one is shown, keys only dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Server liveness as last reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServerHealth {
    #[default]
    Unknown,
    Up(String),
    Down(String),
}

/// Central application state - the single source of truth.
pub struct AppState {
    // ── Query controls ───────────────────────────────────────
    pub filter_text: String,
    pub sort: SortField,
    pub order: SortOrder,
    /// What the token field displays (masked).
    pub token_input: String,
    /// What requests send.
    pub credentials: Credentials,

    // ── Table ────────────────────────────────────────────────
    pub table: TableView,
    /// Selection follows the pid across refreshes.
    pub selected_pid: Option<u32>,
    selected_index: usize,
    /// Unsent nice edits keyed by pid.
    pub pending_nice: HashMap<u32, String>,
    pub last_updated: Option<DateTime<Local>>,

    pub input_mode: InputMode,
    pub show_help: bool,
    pub tick_count: u64,

    // ── Sync indicators (mirrored from the engine) ───────────
    pub auto_refresh: bool,
    pub poll_interval_ms: u64,
    pub reads_in_flight: usize,
    pub actions_in_flight: usize,

    // ── Server ───────────────────────────────────────────────
    pub base_url: String,
    pub health: ServerHealth,

    // ── Status message (shown in status bar) ───────────────────
    pub status_message: Option<(String, Instant)>,

    // ── Popups ───────────────────────────────────────────────
    /// Failed actions waiting to be acknowledged, oldest first.
    pub notifications: VecDeque<Notification>,
    pub show_process_detail: bool,
    pub detail_pid: Option<u32>,
    pub detail_scroll: usize,

    // ── Signal picker popup ──────────────────────────────────
    pub show_signal_picker: bool,
    pub signal_picker_selected: usize,
    pub signal_picker_pid: Option<u32>,
    pub signal_picker_name: String,

    pub theme: Theme,
}

impl AppState {
    pub fn new(token: Option<String>, sort: SortField, order: SortOrder, theme: Theme) -> Self {
        let token_input = token.clone().unwrap_or_default();
        Self {
            filter_text: String::new(),
            sort,
            order,
            token_input,
            credentials: Credentials::new(token),
            table: TableView::Loading,
            selected_pid: None,
            selected_index: 0,
            pending_nice: HashMap::new(),
            last_updated: None,
            input_mode: InputMode::Normal,
            show_help: false,
            tick_count: 0,
            auto_refresh: false,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            reads_in_flight: 0,
            actions_in_flight: 0,
            base_url: DEFAULT_BASE_URL.to_string(),
            health: ServerHealth::Unknown,
            status_message: None,
            notifications: VecDeque::new(),
            show_process_detail: false,
            detail_pid: None,
            detail_scroll: 0,
            show_signal_picker: false,
            signal_picker_selected: DEFAULT_SIGNAL_INDEX,
            signal_picker_pid: None,
            signal_picker_name: String::new(),
            theme,
        }
    }

    /// Cycle to the next built-in theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next_builtin();
    }

    /// Set a status bar message with automatic timestamp.
    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    // ── Query controls ───────────────────────────────────────
    //
    // Each of these is an edit; the caller issues a read right after.

    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Returns false when there was nothing to delete.
    pub fn filter_backspace(&mut self) -> bool {
        self.filter_text.pop().is_some()
    }

    pub fn token_push(&mut self, c: char) {
        self.token_input.push(c);
        self.credentials.set(self.token_input.clone());
    }

    pub fn token_backspace(&mut self) -> bool {
        let changed = self.token_input.pop().is_some();
        self.credentials.set(self.token_input.clone());
        changed
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
    }

    pub fn toggle_order(&mut self) {
        self.order = self.order.toggled();
    }

    // ── Reads ────────────────────────────────────────────────

    /// Apply a completed read. Stale completions never reach the table.
    pub fn apply_read(&mut self, outcome: ReadOutcome) {
        match outcome {
            ReadOutcome::Rows(rows) => {
                self.pending_nice
                    .retain(|pid, _| rows.iter().any(|p| p.pid == *pid));
                if let InputMode::Nice(pid) = self.input_mode {
                    if !rows.iter().any(|p| p.pid == pid) {
                        self.input_mode = InputMode::Normal;
                    }
                }
                self.table = TableView::Rows(rows);
                self.last_updated = Some(Local::now());
                self.reselect();
            }
            ReadOutcome::Failed(failure) => {
                self.table = TableView::Error(failure);
                self.reselect();
            }
            ReadOutcome::Stale => {}
        }
    }

    /// Keep the selected pid when it survived, otherwise stay at the same
    /// position clamped to the new length.
    fn reselect(&mut self) {
        let records = self.table.records();
        if let Some(idx) = self
            .selected_pid
            .and_then(|pid| records.iter().position(|p| p.pid == pid))
        {
            self.selected_index = idx;
            return;
        }
        if records.is_empty() {
            self.selected_index = 0;
            self.selected_pid = None;
        } else {
            self.selected_index = self.selected_index.min(records.len() - 1);
            self.selected_pid = Some(records[self.selected_index].pid);
        }
    }

    pub fn set_health(&mut self, result: Result<HealthStatus, String>) {
        self.health = match result {
            Ok(h) => ServerHealth::Up(h.status),
            Err(e) => ServerHealth::Down(e),
        };
    }

    // ── Selection ────────────────────────────────────────────

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_record(&self) -> Option<&ProcessRecord> {
        self.selected_pid.and_then(|pid| self.table.find(pid))
    }

    fn select_index(&mut self, idx: usize) {
        let records = self.table.records();
        if records.is_empty() {
            return;
        }
        let idx = idx.min(records.len() - 1);
        self.selected_index = idx;
        self.selected_pid = Some(records[idx].pid);
    }

    pub fn scroll_up(&mut self) {
        self.select_index(self.selected_index.saturating_sub(1));
    }

    pub fn scroll_down(&mut self) {
        self.select_index(self.selected_index + 1);
    }

    pub fn page_up(&mut self) {
        self.select_index(self.selected_index.saturating_sub(PAGE_SIZE));
    }

    pub fn page_down(&mut self) {
        self.select_index(self.selected_index + PAGE_SIZE);
    }

    pub fn select_first(&mut self) {
        self.select_index(0);
    }

    pub fn select_last(&mut self) {
        self.select_index(usize::MAX);
    }

    // ── Actions on the selected row ──────────────────────────

    pub fn signal_selected(&self, signal: Signal) -> Option<Action> {
        self.selected_pid.map(|pid| Action::Signal { pid, signal })
    }

    pub fn restart_selected(&self) -> Option<Action> {
        self.selected_pid.map(|pid| Action::Restart { pid })
    }

    /// Open the signal picker for the currently selected process.
    pub fn open_signal_picker(&mut self) {
        if let Some((pid, name)) = self.selected_record().map(|p| (p.pid, p.name.clone())) {
            self.signal_picker_pid = Some(pid);
            self.signal_picker_name = name;
            self.signal_picker_selected = DEFAULT_SIGNAL_INDEX;
            self.show_signal_picker = true;
        }
    }

    pub fn close_signal_picker(&mut self) {
        self.show_signal_picker = false;
        self.signal_picker_pid = None;
    }

    pub fn signal_picker_up(&mut self) {
        self.signal_picker_selected = self.signal_picker_selected.saturating_sub(1);
    }

    pub fn signal_picker_down(&mut self) {
        if self.signal_picker_selected + 1 < SIGNAL_LIST.len() {
            self.signal_picker_selected += 1;
        }
    }

    /// Close the picker and build the chosen action.
    pub fn confirm_signal_picker(&mut self) -> Option<Action> {
        let pid = self.signal_picker_pid?;
        let (signal, _) = SIGNAL_LIST.get(self.signal_picker_selected)?;
        self.close_signal_picker();
        Some(Action::Signal {
            pid,
            signal: *signal,
        })
    }

    // ── Nice editor ──────────────────────────────────────────

    /// Start editing the selected row's nice value. An unsent edit for the
    /// same pid is resumed; otherwise the field starts from the server value.
    pub fn begin_nice_edit(&mut self) {
        let Some((pid, nice)) = self.selected_record().map(|p| (p.pid, p.nice)) else {
            return;
        };
        self.pending_nice
            .entry(pid)
            .or_insert_with(|| nice.to_string());
        self.input_mode = InputMode::Nice(pid);
    }

    pub fn nice_push(&mut self, c: char) {
        if let InputMode::Nice(pid) = self.input_mode {
            self.pending_nice.entry(pid).or_default().push(c);
        }
    }

    pub fn nice_backspace(&mut self) {
        if let InputMode::Nice(pid) = self.input_mode {
            if let Some(text) = self.pending_nice.get_mut(&pid) {
                text.pop();
            }
        }
    }

    /// Finish the edit and build the renice action. Blank or non-numeric
    /// text sends 0.
    pub fn submit_nice(&mut self) -> Option<Action> {
        let InputMode::Nice(pid) = self.input_mode else {
            return None;
        };
        self.input_mode = InputMode::Normal;
        let text = self.pending_nice.remove(&pid).unwrap_or_default();
        Some(Action::Renice {
            pid,
            nice: parse_nice(&text),
        })
    }

    pub fn cancel_nice_edit(&mut self) {
        if let InputMode::Nice(pid) = self.input_mode {
            self.pending_nice.remove(&pid);
        }
        self.input_mode = InputMode::Normal;
    }

    // ── Notifications ────────────────────────────────────────

    pub fn notify_failure(&mut self, action: &Action, error: &str) {
        self.notifications.push_back(Notification {
            title: format!("{} failed", action.label()),
            message: format!("PID {}: {}", action.pid(), error),
        });
    }

    /// The notification on screen, if any.
    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.front()
    }

    pub fn dismiss_notification(&mut self) {
        self.notifications.pop_front();
    }

    // ── Process detail popup ─────────────────────────────────

    pub fn open_process_detail(&mut self) {
        if let Some(pid) = self.selected_pid {
            self.detail_pid = Some(pid);
            self.detail_scroll = 0;
            self.show_process_detail = true;
        }
    }

    pub fn close_process_detail(&mut self) {
        self.show_process_detail = false;
        self.detail_pid = None;
    }

    /// The detailed process, from the latest snapshot. `None` once it is gone.
    pub fn detail_record(&self) -> Option<&ProcessRecord> {
        self.detail_pid.and_then(|pid| self.table.find(pid))
    }
}

impl QuerySource for AppState {
    fn current_query(&self) -> QueryState {
        QueryState {
            filter: self.filter_text.clone(),
            sort: self.sort,
            order: self.order,
            token: self.credentials.header_value(),
        }
    }
}

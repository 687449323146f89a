//! Application struct and event loop.
//!
//! Owns the terminal, the UI state and the sync engine. Terminal input,
//! sync events and the redraw tick are multiplexed with `tokio::select!`
//! on a single thread; network calls run on spawned tasks and come back
//! through the engine's channel.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::api::ProcessApi;
use crate::config::Config;
use crate::constants::*;
use crate::models::{Action, Signal};
use crate::sync::{ReadReason, SyncEngine, SyncEvent, Update};
use crate::ui::{self, AppState, InputMode, Theme};

type Term = Terminal<CrosstermBackend<Stdout>>;

pub struct App<A: ProcessApi> {
    state: AppState,
    engine: SyncEngine<A>,
    auto_refresh: bool,
}

impl<A: ProcessApi> App<A> {
    pub fn new(api: A, config: &Config) -> Self {
        let mut state = AppState::new(
            config.token.clone(),
            config.sort,
            config.order,
            Theme::resolve(&config.theme),
        );
        let engine = SyncEngine::new(api, Duration::from_millis(config.poll_interval_ms));
        state.base_url = config.base_url.clone();
        state.poll_interval_ms = engine.poll_period().as_millis() as u64;

        Self {
            state,
            engine,
            auto_refresh: config.auto_refresh,
        }
    }

    /// Run the main event loop. Returns when the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal().context("initializing terminal")?;
        let result = self.event_loop(&mut terminal).await;
        restore_terminal(&mut terminal).context("restoring terminal")?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut Term) -> Result<()> {
        let mut events = EventStream::new();
        let mut ui_tick = tokio::time::interval(Duration::from_millis(UI_TICK_MS));

        self.startup();

        loop {
            self.sync_indicators();
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            break; // quit requested
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("reading terminal input"),
                    None => break,
                },
                Some(event) = self.engine.next_event() => {
                    self.on_sync_event(event);
                    // Apply whatever else already arrived before redrawing
                    while let Some(event) = self.engine.try_next_event() {
                        self.on_sync_event(event);
                    }
                }
                _ = ui_tick.tick() => {
                    self.state.tick_count = self.state.tick_count.wrapping_add(1);
                }
            }
        }

        self.engine.stop_polling();
        tracing::info!("quit requested");
        Ok(())
    }

    /// Initial read, health probe and (if configured) auto-refresh.
    fn startup(&mut self) {
        tracing::info!(
            base_url = %self.state.base_url,
            poll_ms = self.state.poll_interval_ms,
            auto_refresh = self.auto_refresh,
            "starting"
        );
        self.engine.refresh(&self.state, ReadReason::Startup);
        self.engine.check_health();
        if self.auto_refresh {
            self.engine.start_polling();
        }
    }

    fn sync_indicators(&mut self) {
        self.state.auto_refresh = self.engine.is_polling();
        self.state.reads_in_flight = self.engine.reads_in_flight();
        self.state.actions_in_flight = self.engine.actions_in_flight();
    }

    // ── Sync events ──────────────────────────────────────────────

    fn on_sync_event(&mut self, event: SyncEvent) {
        match self.engine.handle(event, &self.state) {
            Update::Read(outcome) => self.state.apply_read(outcome),
            Update::ActionSucceeded(action) => {
                self.state
                    .set_status(format!("{} ok for PID {}", action.label(), action.pid()));
            }
            Update::ActionFailed { action, error, .. } => {
                self.state.notify_failure(&action, &error);
            }
            Update::Health(result) => self.state.set_health(result),
            Update::ReadIssued(_) | Update::Ignored => {}
        }
    }

    // ── Requests ─────────────────────────────────────────────────

    /// An input control changed: read right away with the new values.
    fn edited(&mut self) {
        self.engine.refresh(&self.state, ReadReason::Edit);
    }

    fn manual_refresh(&mut self) {
        self.engine.refresh(&self.state, ReadReason::Manual);
        self.engine.check_health();
    }

    fn fire(&mut self, action: Option<Action>) {
        match action {
            Some(action) => {
                self.engine.dispatch(action, &self.state);
                self.state
                    .set_status(format!("{} → PID {}", action.label(), action.pid()));
            }
            None => self.state.set_status("No process selected".to_string()),
        }
    }

    // ── Key handling ─────────────────────────────────────────────

    /// Returns `true` if the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        // Failure notification blocks everything else
        if self.state.notification().is_some() {
            return self.handle_key_notification(key);
        }

        if self.state.show_help {
            return self.handle_key_help(key);
        }

        if self.state.show_process_detail {
            return self.handle_key_detail_popup(key);
        }

        if self.state.show_signal_picker {
            return self.handle_key_signal_picker(key);
        }

        match self.state.input_mode {
            InputMode::Nice(_) => self.handle_key_nice(key),
            InputMode::Filter => self.handle_key_filter(key),
            InputMode::Token => self.handle_key_token(key),
            InputMode::Normal => self.handle_key_normal(key),
        }
    }

    fn handle_key_notification(&mut self, key: KeyEvent) -> bool {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.state.dismiss_notification();
        }
        false
    }

    fn handle_key_help(&mut self, key: KeyEvent) -> bool {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            self.state.show_help = false;
        }
        false
    }

    fn handle_key_detail_popup(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.state.close_process_detail();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.detail_scroll = self.state.detail_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.detail_scroll += 1;
            }
            _ => {}
        }
        false
    }

    fn handle_key_signal_picker(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.state.close_signal_picker(),
            KeyCode::Up | KeyCode::Char('k') => self.state.signal_picker_up(),
            KeyCode::Down | KeyCode::Char('j') => self.state.signal_picker_down(),
            KeyCode::Enter => {
                let action = self.state.confirm_signal_picker();
                self.fire(action);
            }
            _ => {}
        }
        false
    }

    fn handle_key_nice(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => self.state.cancel_nice_edit(),
            KeyCode::Enter => {
                let action = self.state.submit_nice();
                self.fire(action);
            }
            KeyCode::Backspace => self.state.nice_backspace(),
            KeyCode::Char(c) => self.state.nice_push(c),
            _ => {}
        }
        false
    }

    fn handle_key_filter(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                if self.state.filter_backspace() {
                    self.edited();
                }
            }
            KeyCode::Char(c) => {
                self.state.filter_push(c);
                self.edited();
            }
            _ => {}
        }
        false
    }

    fn handle_key_token(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.state.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                if self.state.token_backspace() {
                    self.edited();
                }
            }
            KeyCode::Char(c) => {
                self.state.token_push(c);
                self.edited();
            }
            _ => {}
        }
        false
    }

    /// Handle keys in normal mode. Returns `true` if the app should quit.
    fn handle_key_normal(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,

            // Selection
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_down(),
            KeyCode::PageUp => self.state.page_up(),
            KeyCode::PageDown => self.state.page_down(),
            KeyCode::Home => self.state.select_first(),
            KeyCode::End => self.state.select_last(),

            // Query controls
            KeyCode::Char('/') => self.state.input_mode = InputMode::Filter,
            KeyCode::Char('a') => self.state.input_mode = InputMode::Token,
            KeyCode::Char('s') => {
                self.state.cycle_sort();
                self.edited();
            }
            KeyCode::Char('o') => {
                self.state.toggle_order();
                self.edited();
            }
            KeyCode::Esc => {
                if !self.state.filter_text.is_empty() {
                    self.state.filter_text.clear();
                    self.edited();
                }
            }

            // Refresh
            KeyCode::Char('r') | KeyCode::F(5) => self.manual_refresh(),
            KeyCode::Char('p') => {
                let on = self.engine.toggle_polling();
                tracing::info!(auto_refresh = on, "auto-refresh toggled");
                self.state.set_status(
                    if on { "Auto-refresh on" } else { "Auto-refresh off" }.to_string(),
                );
            }

            // Actions
            KeyCode::Char('t') => {
                let action = self.state.signal_selected(Signal::Term);
                self.fire(action);
            }
            KeyCode::Char('K') => {
                let action = self.state.signal_selected(Signal::Kill);
                self.fire(action);
            }
            KeyCode::Char('h') => {
                let action = self.state.signal_selected(Signal::Hup);
                self.fire(action);
            }
            KeyCode::Char('R') => {
                let action = self.state.restart_selected();
                self.fire(action);
            }
            KeyCode::Char('x') => self.state.open_signal_picker(),
            KeyCode::Char('n') => self.state.begin_nice_edit(),

            // Popups and look
            KeyCode::Enter => self.state.open_process_detail(),
            KeyCode::Char('?') => self.state.show_help = true,
            KeyCode::Char('T') => {
                self.state.cycle_theme();
                let name = self.state.theme.name.clone();
                self.state.set_status(format!("Theme: {}", name));
            }
            _ => {}
        }
        false
    }
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

//! Renderer module: split into focused submodules.
//!
//! - `header`: Logo, server health, refresh state
//! - `processes`: Query bar and process table
//! - `status_bar`: Bottom status bar with keybinds
//! - `overlays`: Popups (process detail, help, signal picker, nice editor,
//!   failure notification)
//! - `helpers`: Shared rendering utilities

mod header;
pub mod helpers;
mod overlays;
mod processes;
mod status_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::state::{AppState, InputMode};

/// Top-level render function.
pub fn render(frame: &mut Frame, state: &AppState) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header bar
            Constraint::Min(8),    // Query bar + table
            Constraint::Length(1), // Status bar
        ])
        .split(size);

    header::render_header(frame, main_chunks[0], state);
    processes::render_processes(frame, main_chunks[1], state);
    status_bar::render_status_bar(frame, main_chunks[2], state);

    if state.show_process_detail {
        overlays::render_process_detail(frame, size, state);
    }

    if state.show_signal_picker {
        overlays::render_signal_picker(frame, size, state);
    }

    if matches!(state.input_mode, InputMode::Nice(_)) {
        overlays::render_nice_editor(frame, size, state);
    }

    if state.show_help {
        overlays::render_help_overlay(frame, size, state);
    }

    if state.notification().is_some() {
        overlays::render_notification(frame, size, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::api::ReadFailure;
    use crate::models::{Action, ProcessRecord, Signal, SortField, SortOrder};
    use crate::sync::ReadOutcome;
    use crate::ui::table::{EMPTY_TEXT, LOADING_TEXT};
    use crate::ui::theme::Theme;

    fn make_state() -> AppState {
        AppState::new(None, SortField::Cpu, SortOrder::Desc, Theme::default_dark())
    }

    fn draw(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(200, 40)).unwrap();
        terminal.draw(|f| render(f, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn draws_loading_placeholder() {
        assert!(draw(&make_state()).contains(LOADING_TEXT));
    }

    #[test]
    fn draws_empty_placeholder() {
        let mut s = make_state();
        s.apply_read(ReadOutcome::Rows(vec![]));
        assert!(draw(&s).contains(EMPTY_TEXT));
    }

    #[test]
    fn draws_error_row_with_status() {
        let mut s = make_state();
        s.apply_read(ReadOutcome::Failed(ReadFailure {
            status: Some(500),
            message: "HTTP 500".to_string(),
        }));
        assert!(draw(&s).contains("Error: 500"));
    }

    #[test]
    fn long_error_message_is_not_cut_to_a_column() {
        let mut s = make_state();
        let message = "error sending request for url (http://10.0.0.5:8088/api/processes)";
        s.apply_read(ReadOutcome::Failed(ReadFailure {
            status: None,
            message: message.to_string(),
        }));
        assert!(draw(&s).contains(message));
    }

    #[test]
    fn command_column_comes_before_nice() {
        let mut s = make_state();
        s.apply_read(ReadOutcome::Rows(vec![ProcessRecord {
            pid: 1,
            ..Default::default()
        }]));
        let screen = draw(&s);
        let header = screen.lines().find(|l| l.contains("PORTS")).unwrap();
        let ports = header.find("PORTS").unwrap();
        let cmd = header.find("CMD").unwrap();
        let nice = header.find("NICE").unwrap();
        let actions = header.find("ACTIONS").unwrap();
        assert!(ports < cmd && cmd < nice && nice < actions);
    }

    #[test]
    fn draws_process_rows() {
        let mut s = make_state();
        s.apply_read(ReadOutcome::Rows(vec![ProcessRecord {
            pid: 4242,
            name: "postgres".to_string(),
            ..Default::default()
        }]));
        let screen = draw(&s);
        assert!(screen.contains("4242"));
        assert!(screen.contains("postgres"));
    }

    #[test]
    fn draws_notification_over_table() {
        let mut s = make_state();
        s.notify_failure(
            &Action::Signal {
                pid: 9,
                signal: Signal::Term,
            },
            "HTTP 401",
        );
        assert!(draw(&s).contains("Signal TERM failed"));
    }
}

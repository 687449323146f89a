//! Header bar: logo, server, health, refresh state.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::state::{AppState, ServerHealth};
use crate::utils::{spinner_char, truncate_str};

pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(16), // Logo
            Constraint::Min(20),    // Server + health
            Constraint::Length(36), // Refresh state
        ])
        .split(area);

    // Logo
    let pulse = if state.tick_count % 2 == 0 {
        "●"
    } else {
        "○"
    };
    let logo = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(pulse, Style::default().fg(t.success)),
        Span::styled(" procwatch", t.header_style()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(logo, chunks[0]);

    // Server and health
    let (health_text, health_color) = match &state.health {
        ServerHealth::Unknown => ("…".to_string(), t.text_muted),
        ServerHealth::Up(status) => (status.clone(), t.success),
        ServerHealth::Down(_) => ("unreachable".to_string(), t.danger),
    };
    let url_width = (chunks[1].width as usize).saturating_sub(health_text.len() + 8);
    let server = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", truncate_str(&state.base_url, url_width)),
            Style::default().fg(t.text_primary),
        ),
        Span::styled(
            format!(" {} ", health_text),
            Style::default()
                .fg(t.bg_dark)
                .bg(health_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.border_style()),
    );
    frame.render_widget(server, chunks[1]);

    // Refresh state
    let mut spans = Vec::new();
    if state.reads_in_flight > 0 || state.actions_in_flight > 0 {
        spans.push(Span::styled(
            format!("{} ", spinner_char(state.tick_count)),
            Style::default().fg(t.accent),
        ));
    }
    if state.auto_refresh {
        spans.push(Span::styled(
            format!("auto {:.1}s", state.poll_interval_ms as f64 / 1000.0),
            Style::default().fg(t.success),
        ));
    } else {
        spans.push(Span::styled("auto off", Style::default().fg(t.warning)));
    }
    if let Some(at) = state.last_updated {
        spans.push(Span::styled(
            format!(" │ {} ", at.format("%H:%M:%S")),
            Style::default().fg(t.text_dim),
        ));
    }
    let refresh = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(t.border_style()),
        );
    frame.render_widget(refresh, chunks[2]);
}

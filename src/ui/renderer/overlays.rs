//! Popup overlays: process detail, help, signal picker, nice editor,
//! failure notification.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::constants::*;
use crate::models::{Signal, SIGNAL_LIST};
use crate::ui::state::{AppState, InputMode};
use crate::ui::theme::Theme;
use crate::utils::{humanize_bytes, parse_nice, port_label, truncate_str};

use super::helpers::centered_rect;

pub fn render_process_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup_width = DETAIL_POPUP_WIDTH.min(area.width.saturating_sub(4));
    let popup_height = DETAIL_POPUP_HEIGHT.min(area.height.saturating_sub(4));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let Some(p) = state.detail_record() else {
        let gone = Paragraph::new(Line::from(Span::styled(
            "  Process is no longer in the list.",
            Style::default().fg(t.text_dim),
        )))
        .block(
            Block::default()
                .title(Span::styled(" Process (Esc to close) ", t.header_style()))
                .borders(Borders::ALL)
                .border_style(t.border_highlight_style()),
        );
        frame.render_widget(gone, popup_area);
        return;
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" Process {} - {} (Esc to close, ↑↓ scroll) ", p.pid, p.name),
            t.header_style(),
        ))
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let unknown = "-".to_string();
    let mut lines: Vec<Line> = vec![section("Process Info", t)];
    lines.push(detail_line("PID:      ", &p.pid.to_string(), t));
    lines.push(detail_line("Name:     ", &p.name, t));
    lines.push(detail_line("User:     ", &p.username, t));
    lines.push(detail_line(
        "Status:   ",
        p.status.as_ref().unwrap_or(&unknown),
        t,
    ));
    if let Some(ppid) = p.ppid {
        lines.push(detail_line("Parent:   ", &format!("PID {}", ppid), t));
    }
    lines.push(detail_line("Started:  ", p.create_time_iso.as_ref().unwrap_or(&unknown), t));
    lines.push(detail_line("Nice:     ", &p.nice.to_string(), t));
    lines.push(Line::raw(""));

    lines.push(section("Resources", t));
    lines.push(detail_line("CPU:      ", &format!("{:.1}%", p.cpu_percent), t));
    lines.push(detail_line("Memory:   ", &humanize_bytes(p.memory_rss), t));
    if let Some(n) = p.open_files_count {
        lines.push(detail_line("Open fds: ", &n.to_string(), t));
    }
    lines.push(Line::raw(""));

    lines.push(section("Command", t));
    let cmd_width = (inner.width as usize).saturating_sub(4);
    lines.push(detail_line(
        "Exe:      ",
        &truncate_str(p.exe.as_ref().unwrap_or(&unknown), cmd_width.saturating_sub(10)),
        t,
    ));
    lines.push(Line::from(Span::styled(
        format!("  {}", p.command_line()),
        Style::default().fg(t.text_muted),
    )));
    lines.push(Line::raw(""));

    lines.push(section(&format!("Ports ({})", p.ports.len()), t));
    if p.ports.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none",
            Style::default().fg(t.text_muted),
        )));
    }
    for binding in &p.ports {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", port_label(binding)), t.pill_style()),
            Span::styled(
                format!(" {}", binding.status.as_deref().unwrap_or("")),
                Style::default().fg(t.text_dim),
            ),
        ]));
    }

    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.detail_scroll as u16, 0));
    frame.render_widget(detail, inner);
}

fn section<'a>(title: &str, t: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
    ))
}

/// Helper: create a simple "  label: value" detail line.
fn detail_line<'a>(label: &str, value: &str, t: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {}", label), Style::default().fg(t.text_dim)),
        Span::styled(value.to_string(), Style::default().fg(t.text_primary)),
    ])
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup_area = centered_rect(52, 28, area);

    frame.render_widget(Clear, popup_area);

    let help_entry = |key: &str, desc: &str, color: ratatui::style::Color| -> Line {
        Line::from(vec![
            Span::styled(
                format!("  {:<16}", key),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(desc.to_string(), Style::default().fg(t.text_primary)),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled("  procwatch - Keyboard Shortcuts", t.header_style())),
        Line::raw(""),
        help_entry("Up/Down / j/k", "Move selection", t.accent),
        help_entry("PgUp / PgDn", "Page up/down", t.accent),
        help_entry("Home / End", "First / last row", t.accent),
        help_entry("/", "Edit filter", t.accent),
        help_entry("s", "Cycle sort field", t.accent),
        help_entry("o", "Toggle sort order", t.accent),
        help_entry("a", "Edit auth token", t.accent),
        help_entry("r / F5", "Refresh now", t.accent),
        help_entry("p", "Toggle auto-refresh", t.accent),
        help_entry("Enter", "Process detail", t.accent),
        help_entry("t", "Send TERM", t.warning),
        help_entry("K (shift)", "Send KILL", t.danger),
        help_entry("h", "Send HUP", t.warning),
        help_entry("x", "Signal picker", t.warning),
        help_entry("n", "Edit nice value", t.accent),
        help_entry("R (shift)", "Restart process", t.danger),
        help_entry("T", "Cycle color theme", t.accent),
        help_entry("Esc", "Clear filter / close", t.accent),
        help_entry("q", "Quit", t.accent),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Filter, sort, order and token edits ", Style::default().fg(t.text_dim)),
            Span::styled("refresh immediately.", Style::default().fg(t.text_muted)),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" Help ", t.header_style()))
                .borders(Borders::ALL)
                .border_style(t.border_highlight_style()),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(help, popup_area);
}

pub fn render_signal_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = (SIGNAL_LIST.len() as u16 + 5).min(area.height.saturating_sub(4));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let title = format!(
        " Send Signal to PID {} ({}) ",
        state.signal_picker_pid.unwrap_or(0),
        truncate_str(&state.signal_picker_name, 16),
    );

    let block = Block::default()
        .title(Span::styled(title, t.header_style()))
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            " Select a signal (Enter to send, Esc to cancel):",
            Style::default().fg(t.text_dim),
        )),
        Line::raw(""),
    ];

    for (i, (signal, desc)) in SIGNAL_LIST.iter().enumerate() {
        let is_selected = i == state.signal_picker_selected;
        let prefix = if is_selected { " > " } else { "   " };

        let style = if is_selected {
            t.table_row_selected()
        } else {
            Style::default().fg(t.text_primary)
        };
        let name_style = if *signal == Signal::Kill {
            style.fg(t.danger)
        } else {
            style
        };

        lines.push(Line::from(vec![
            Span::styled(prefix, style),
            Span::styled(format!("{:<6}", signal.name()), name_style),
            Span::styled(*desc, Style::default().fg(t.text_dim)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

pub fn render_nice_editor(frame: &mut Frame, area: Rect, state: &AppState) {
    let InputMode::Nice(pid) = state.input_mode else {
        return;
    };
    let t = &state.theme;
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 10.min(area.height.saturating_sub(4));
    let popup_area = centered_rect(popup_width, popup_height, area);

    frame.render_widget(Clear, popup_area);

    let name = state.table.find(pid).map(|p| p.name.as_str()).unwrap_or("");
    let block = Block::default()
        .title(Span::styled(
            format!(" Renice PID {} ({}) ", pid, truncate_str(name, 16)),
            t.header_style(),
        ))
        .borders(Borders::ALL)
        .border_style(t.border_highlight_style());
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = state.pending_nice.get(&pid).map(String::as_str).unwrap_or("");
    let nice = parse_nice(text);
    let nice_color = if nice < 0 {
        t.danger
    } else if nice == 0 {
        t.success
    } else {
        t.text_dim
    };

    // Position marker on the -20..19 scale
    let bar_width = 40.min(inner.width.saturating_sub(12)) as usize;
    let pos = nice_marker_pos(nice, bar_width);
    let bar: String = (0..bar_width)
        .map(|i| if i == pos { '█' } else { '░' })
        .collect();

    let key = |k: &str| {
        Span::styled(
            k.to_string(),
            Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
        )
    };

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Nice value: ", Style::default().fg(t.text_dim)),
            Span::styled(
                format!("{}_", text),
                Style::default().fg(t.text_primary).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  sends {:+}", nice),
                Style::default().fg(nice_color),
            ),
        ]),
        Line::raw(""),
        Line::from(vec![
            Span::styled(format!("  {} ", NICE_MIN), Style::default().fg(t.danger)),
            Span::styled(bar, Style::default().fg(nice_color)),
            Span::styled(format!(" {:+}", NICE_MAX), Style::default().fg(t.text_dim)),
        ]),
        Line::raw(""),
        Line::from(vec![
            key("  Enter "),
            Span::styled("Apply  ", Style::default().fg(t.text_dim)),
            key("Esc "),
            Span::styled("Cancel", Style::default().fg(t.text_dim)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Failed action. Drawn last so it covers every other popup.
pub fn render_notification(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(note) = state.notification() else {
        return;
    };
    let t = &state.theme;
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_area = centered_rect(popup_width, 8, area);

    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", note.message),
            Style::default().fg(t.text_primary),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                "  Enter / Esc ",
                Style::default().fg(t.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled("Dismiss", Style::default().fg(t.text_dim)),
            Span::styled(queued_label(state.notifications.len()), Style::default().fg(t.text_muted)),
        ]),
    ];

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {} ", note.title),
                    Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(t.danger)),
        );
    frame.render_widget(popup, popup_area);
}

fn queued_label(total: usize) -> String {
    match total.saturating_sub(1) {
        0 => String::new(),
        more => format!("  ({} more)", more),
    }
}

/// Cell of the nice bar marker; NICE_MIN maps to the first cell, NICE_MAX to the last.
fn nice_marker_pos(nice: i32, bar_width: usize) -> usize {
    if bar_width < 2 {
        return 0;
    }
    let span = (NICE_MAX - NICE_MIN) as f64;
    let offset = (nice.clamp(NICE_MIN, NICE_MAX) - NICE_MIN) as f64;
    (offset / span * (bar_width - 1) as f64).round() as usize
}

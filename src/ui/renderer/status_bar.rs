//! Status bar at the bottom of the screen.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::constants::STATUS_MESSAGE_TIMEOUT_SECS;
use crate::ui::state::{AppState, InputMode};

use super::helpers::{dim, key_badge};

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let mut spans = vec![Span::raw(" ")];

    // Keybinds depend on what is receiving input
    let keys: &[(&str, &str, bool)] = match state.input_mode {
        InputMode::Filter | InputMode::Token => &[
            ("Enter", " Done ", false),
            ("Esc", " Done ", false),
            ("⌫", " Delete ", false),
        ],
        InputMode::Nice(_) => &[
            ("Enter", " Send renice ", false),
            ("Esc", " Cancel ", false),
        ],
        InputMode::Normal => &[
            ("q", " Quit ", false),
            ("/", " Filter ", false),
            ("s", " Sort ", false),
            ("o", " Order ", false),
            ("a", " Token ", false),
            ("r", " Refresh ", false),
            ("p", " Auto ", false),
            ("t", " TERM ", true),
            ("K", " KILL ", true),
            ("x", " Signal ", true),
            ("n", " Nice ", false),
            ("R", " Restart ", true),
            ("?", " Help ", false),
        ],
    };
    for (key, label, risky) in keys {
        let color = if *risky { t.warning } else { t.accent };
        spans.push(key_badge(key, color, t));
        spans.push(dim(label, t));
    }

    // Status message auto-expires
    if let Some((msg, when)) = &state.status_message {
        if when.elapsed().as_secs() < STATUS_MESSAGE_TIMEOUT_SECS {
            spans.push(Span::styled(
                format!("  {} ", msg),
                Style::default().fg(t.warning).add_modifier(Modifier::BOLD),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

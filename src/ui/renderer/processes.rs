//! Process table: query bar and the rows produced by `build_table`.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::models::SortField;
use crate::ui::state::{AppState, InputMode};
use crate::ui::table::{build_table, ProcessRow, RowModel, ACTION_HINTS};
use crate::utils::{mask_secret, truncate_str};

use super::helpers::render_scrollbar_bordered;

pub fn render_processes(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query bar
            Constraint::Min(5),    // Process table
        ])
        .split(area);

    render_query_bar(frame, chunks[0], state);
    render_table(frame, chunks[1], state);
}

fn render_query_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let label = |text: &str| Span::styled(text.to_string(), Style::default().fg(t.text_dim));
    let field = |text: String, editing: bool| {
        if editing {
            Span::styled(
                format!("{}_", text),
                Style::default()
                    .fg(t.accent)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(text, Style::default().fg(t.text_primary))
        }
    };

    let filter = if state.filter_text.is_empty() && state.input_mode != InputMode::Filter {
        Span::styled("(/ to filter)", Style::default().fg(t.text_muted))
    } else {
        field(
            state.filter_text.clone(),
            state.input_mode == InputMode::Filter,
        )
    };
    let token = if state.token_input.is_empty() && state.input_mode != InputMode::Token {
        Span::styled("(a to set)", Style::default().fg(t.text_muted))
    } else {
        field(
            mask_secret(&state.token_input),
            state.input_mode == InputMode::Token,
        )
    };

    let line = Line::from(vec![
        label(" Filter: "),
        filter,
        label(" │ Sort: "),
        Span::styled(
            format!("{} {}", state.sort, state.order.arrow()),
            Style::default().fg(t.accent_secondary),
        ),
        label(" │ Token: "),
        token,
    ]);

    let border = if matches!(state.input_mode, InputMode::Filter | InputMode::Token) {
        t.border_highlight_style()
    } else {
        t.border_style()
    };
    let bar = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(bar, area);
}

fn render_table(frame: &mut Frame, area: Rect, state: &AppState) {
    let t = &state.theme;
    let models = build_table(&state.table, &state.pending_nice);

    let sort_indicator = |field: SortField| -> &'static str {
        if field == state.sort {
            state.order.arrow()
        } else {
            ""
        }
    };
    let labels = [
        format!("PID{}", sort_indicator(SortField::Pid)),
        format!("NAME{}", sort_indicator(SortField::Name)),
        "USER".to_string(),
        format!("CPU %{}", sort_indicator(SortField::Cpu)),
        format!("MEMORY{}", sort_indicator(SortField::Mem)),
        "PORTS".to_string(),
        "CMD".to_string(),
        "NICE".to_string(),
        "ACTIONS".to_string(),
    ];
    let header = Row::new(labels.into_iter().map(Cell::from).collect::<Vec<_>>())
        .style(t.table_header_style())
        .height(1);

    let editing_pid = match state.input_mode {
        InputMode::Nice(pid) => Some(pid),
        _ => None,
    };

    let rows: Vec<Row> = models
        .iter()
        .filter_map(|model| match model {
            RowModel::Process(p) => Some(process_row(p, editing_pid == Some(p.pid), state)),
            _ => None,
        })
        .collect();

    let total = state.table.records().len();
    let title = format!(" Processes ({}) ", total);
    let block = Block::default()
        .title(Span::styled(title, t.header_style()))
        .borders(Borders::ALL)
        .border_style(t.border_style());

    // Placeholder and error rows get the full table width
    let message = match models.as_slice() {
        [RowModel::Placeholder(text)] => Some(Span::styled(*text, Style::default().fg(t.text_dim))),
        [RowModel::Error(text)] => Some(Span::styled(
            text.clone(),
            Style::default().fg(t.danger).add_modifier(Modifier::BOLD),
        )),
        _ => None,
    };
    if let Some(message) = message {
        let body = Paragraph::new(Line::from(vec![Span::raw(" "), message]))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(body, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(20),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Length(10),
            Constraint::Length(34),
            Constraint::Min(20),
            Constraint::Length(6),
            Constraint::Length(ACTION_HINTS.chars().count() as u16),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(t.table_row_selected());

    let mut table_state = TableState::default();
    if total > 0 {
        table_state.select(Some(state.selected_index()));
    }
    frame.render_stateful_widget(table, area, &mut table_state);

    render_scrollbar_bordered(frame, area, total, state.selected_index());
}

fn process_row<'a>(p: &'a ProcessRow, editing: bool, state: &AppState) -> Row<'a> {
    let t = &state.theme;

    let mut port_spans: Vec<Span> = Vec::new();
    for pill in &p.pills {
        port_spans.push(Span::styled(format!(" {} ", pill.label), t.pill_style()));
        port_spans.push(Span::raw(" "));
    }
    if let Some(more) = &p.overflow {
        port_spans.push(Span::styled(
            format!(" {} ", more),
            Style::default().fg(t.bg_dark).bg(t.text_dim),
        ));
    }

    let nice_style = if editing {
        Style::default()
            .fg(t.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if p.nice_pending {
        Style::default().fg(t.warning)
    } else {
        Style::default().fg(t.text_dim)
    };
    let nice = if editing {
        format!("{}_", p.nice)
    } else {
        p.nice.clone()
    };

    Row::new(vec![
        Cell::from(p.pid.to_string()).style(Style::default().fg(t.text_dim)),
        Cell::from(truncate_str(&p.name, 20)),
        Cell::from(truncate_str(&p.user, 10)).style(Style::default().fg(t.text_dim)),
        Cell::from(p.cpu.as_str()).style(Style::default().fg(t.usage_color(p.cpu_percent))),
        Cell::from(p.memory.as_str()),
        Cell::from(Line::from(port_spans)),
        Cell::from(p.cmdline.as_str()).style(Style::default().fg(t.text_muted)),
        Cell::from(nice).style(nice_style),
        Cell::from(ACTION_HINTS).style(Style::default().fg(t.text_muted)),
    ])
    .style(t.table_row_normal())
}

//! Pure transform from the applied read into row models.
//!
//! Nothing here touches the terminal; `renderer::processes` draws whatever
//! [`build_table`] returns.

use std::collections::HashMap;

use crate::api::ReadFailure;
use crate::models::ProcessRecord;
use crate::utils::{format_cpu, humanize_bytes, join_cmdline, port_label};

pub const LOADING_TEXT: &str = "Loading processes...";
pub const EMPTY_TEXT: &str = "No processes";

/// Hint shown in the actions column of every process row.
pub const ACTION_HINTS: &str = "t stop · K kill · h hup · R restart";

/// The most recently applied read.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TableView {
    #[default]
    Loading,
    Rows(Vec<ProcessRecord>),
    Error(ReadFailure),
}

impl TableView {
    /// Records of the applied snapshot; empty while loading or failed.
    pub fn records(&self) -> &[ProcessRecord] {
        match self {
            TableView::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn find(&self, pid: u32) -> Option<&ProcessRecord> {
        self.records().iter().find(|p| p.pid == pid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortPill {
    pub label: String,
    /// Socket status, e.g. `LISTEN`.
    pub tooltip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    pub user: String,
    pub cpu: String,
    pub cpu_percent: f64,
    pub memory: String,
    pub pills: Vec<PortPill>,
    /// `+N` when more bindings exist than pills shown.
    pub overflow: Option<String>,
    pub cmdline: String,
    pub nice: String,
    /// The nice column shows an unsent edit rather than the server value.
    pub nice_pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowModel {
    Placeholder(&'static str),
    Error(String),
    Process(ProcessRow),
}

pub fn build_table(view: &TableView, pending_nice: &HashMap<u32, String>) -> Vec<RowModel> {
    match view {
        TableView::Loading => vec![RowModel::Placeholder(LOADING_TEXT)],
        TableView::Error(failure) => vec![RowModel::Error(failure.to_string())],
        TableView::Rows(rows) if rows.is_empty() => vec![RowModel::Placeholder(EMPTY_TEXT)],
        TableView::Rows(rows) => rows
            .iter()
            .map(|p| RowModel::Process(process_row(p, pending_nice.get(&p.pid))))
            .collect(),
    }
}

fn process_row(p: &ProcessRecord, pending: Option<&String>) -> ProcessRow {
    let pills = p
        .visible_ports()
        .iter()
        .map(|b| PortPill {
            label: port_label(b),
            tooltip: b.status.clone(),
        })
        .collect();
    let hidden = p.hidden_port_count();

    ProcessRow {
        pid: p.pid,
        name: p.name.clone(),
        user: p.username.clone(),
        cpu: format_cpu(p.cpu_percent),
        cpu_percent: p.cpu_percent,
        memory: humanize_bytes(p.memory_rss),
        pills,
        overflow: (hidden > 0).then(|| format!("+{}", hidden)),
        cmdline: join_cmdline(&p.cmdline),
        nice: pending.cloned().unwrap_or_else(|| p.nice.to_string()),
        nice_pending: pending.is_some(),
    }
}

use std::fmt;

use serde::Serialize;

/// Signals the server accepts on the signal endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Term,
    Kill,
    Hup,
    Int,
    Stop,
    Cont,
}

/// Signal picker entries: signal and a short description.
pub const SIGNAL_LIST: &[(Signal, &str)] = &[
    (Signal::Term, "Graceful termination"),
    (Signal::Kill, "Force kill (unblockable)"),
    (Signal::Hup, "Hangup / reload config"),
    (Signal::Int, "Interrupt (Ctrl+C)"),
    (Signal::Stop, "Stop (unblockable)"),
    (Signal::Cont, "Continue if stopped"),
];

impl Signal {
    /// Wire name, e.g. `TERM`.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Term => "TERM",
            Signal::Kill => "KILL",
            Signal::Hup => "HUP",
            Signal::Int => "INT",
            Signal::Stop => "STOP",
            Signal::Cont => "CONT",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A mutating request against one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Signal { pid: u32, signal: Signal },
    Renice { pid: u32, nice: i32 },
    Restart { pid: u32 },
}

impl Action {
    pub fn pid(&self) -> u32 {
        match self {
            Action::Signal { pid, .. } | Action::Renice { pid, .. } | Action::Restart { pid } => {
                *pid
            }
        }
    }

    /// Short label naming the action, used in notifications and logs.
    pub fn label(&self) -> String {
        match self {
            Action::Signal { signal, .. } => format!("Signal {}", signal),
            Action::Renice { nice, .. } => format!("Renice to {:+}", nice),
            Action::Restart { .. } => "Restart".to_string(),
        }
    }
}

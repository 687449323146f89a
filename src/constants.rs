//! Application-wide constants.
//!
//! Centralizes timing defaults, display limits, API paths and filesystem
//! locations so the rest of the codebase never hardcodes them.

use std::path::PathBuf;

// ── Timing ────────────────────────────────────────────────────────
/// Default auto-refresh period (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
/// Minimum allowed auto-refresh period (ms) to avoid hammering the server.
pub const MIN_POLL_INTERVAL_MS: u64 = 250;
/// Redraw cadence of the UI when nothing else happens (ms).
pub const UI_TICK_MS: u64 = 250;
/// Status message display duration (seconds).
pub const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 5;

// ── Server ────────────────────────────────────────────────────────
/// Default base URL of the process API.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8088";
/// Header carrying the auth token on every call.
pub const AUTH_HEADER: &str = "X-Auth-Token";
/// Read endpoint.
pub const PROCESSES_PATH: &str = "/api/processes";
/// Unauthenticated liveness endpoint.
pub const HEALTH_PATH: &str = "/api/health";
/// Environment variable overriding the base URL.
pub const ENV_URL: &str = "PROCWATCH_URL";
/// Environment variable supplying the auth token.
pub const ENV_TOKEN: &str = "PROCWATCH_TOKEN";

// ── Display ───────────────────────────────────────────────────────
/// Port bindings rendered per process before the overflow badge.
pub const MAX_PORT_PILLS: usize = 4;
/// Binary units for memory display, in ascending order.
pub const BYTE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
/// CPU percentage at which the cell turns warning-colored.
pub const CPU_MID_PCT: f64 = 40.0;
/// CPU percentage at which the cell turns danger-colored.
pub const CPU_HIGH_PCT: f64 = 80.0;
/// Page up/down step size.
pub const PAGE_SIZE: usize = 20;
/// Process detail popup max width.
pub const DETAIL_POPUP_WIDTH: u16 = 80;
/// Process detail popup max height.
pub const DETAIL_POPUP_HEIGHT: u16 = 30;

// ── Process Management ────────────────────────────────────────────
/// Minimum nice value (highest priority).
pub const NICE_MIN: i32 = -20;
/// Maximum nice value (lowest priority).
pub const NICE_MAX: i32 = 19;
/// Default signal picker selection index (TERM).
pub const DEFAULT_SIGNAL_INDEX: usize = 0;

// ── Logging ───────────────────────────────────────────────────────
/// Default tracing directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVE: &str = "procwatch=info";
/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "procwatch.log";

// ── Paths ─────────────────────────────────────────────────────────

/// Returns the user's home directory, falling back to /tmp.
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

/// Returns `~/.config/procwatch/`.
pub fn config_dir() -> PathBuf {
    home_dir().join(".config").join("procwatch")
}

/// Returns `~/.config/procwatch/config.toml`.
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns `~/.config/procwatch/themes/<name>.toml`.
pub fn custom_theme_path(name: &str) -> PathBuf {
    config_dir().join("themes").join(format!("{}.toml", name))
}

/// Returns `~/.config/procwatch/.env`.
pub fn env_file_path() -> PathBuf {
    config_dir().join(".env")
}

/// Returns `~/.local/share/procwatch/`.
pub fn data_dir() -> PathBuf {
    home_dir().join(".local").join("share").join("procwatch")
}

/// Returns the default log file path.
pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

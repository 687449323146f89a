//! # procwatch - remote process control panel
//!
//! Lists the processes of a remote host through its HTTP API, keeps the
//! view fresh with manual and timed reads, and sends signals, renice and
//! restart requests per process.

mod api;
mod app;
mod config;
pub mod constants;
mod logging;
mod models;
mod sync;
mod ui;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use api::ApiClient;
use config::Config;
use constants::MIN_POLL_INTERVAL_MS;
use models::{SortField, SortOrder};

/// procwatch - terminal control panel for a remote process API
#[derive(Parser, Debug)]
#[command(name = "procwatch", version, about = "Inspect and manage remote processes over HTTP")]
struct Cli {
    /// Base URL of the process API (e.g. http://10.0.0.5:8088)
    #[arg(long, short = 'u', value_name = "URL")]
    url: Option<String>,

    /// Auth token sent as X-Auth-Token
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Auto-refresh period in milliseconds
    #[arg(long, short = 'i', value_name = "MS")]
    interval_ms: Option<u64>,

    /// Start with auto-refresh disabled
    #[arg(long)]
    no_auto_refresh: bool,

    /// Initial sort field (cpu, mem, pid, name)
    #[arg(long, short = 's')]
    sort: Option<SortField>,

    /// Initial sort order (asc, desc)
    #[arg(long, short = 'o')]
    order: Option<SortOrder>,

    /// Color theme (default, gruvbox, nord, or a custom theme name)
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// Log file (defaults to ~/.local/share/procwatch/procwatch.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.url {
            config.base_url = url;
        }
        if let Some(token) = self.token {
            config.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(ms) = self.interval_ms {
            config.poll_interval_ms = ms.max(MIN_POLL_INTERVAL_MS);
        }
        if self.no_auto_refresh {
            config.auto_refresh = false;
        }
        if let Some(sort) = self.sort {
            config.sort = sort;
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .unwrap_or_else(constants::default_log_path);
    logging::init_logging(&log_path)?;

    // Defaults < config file < environment < CLI
    let mut config = Config::load();
    cli.apply(&mut config);

    let api = ApiClient::new(&config.base_url);
    tracing::info!(base_url = api.base_url(), has_token = config.token.is_some(), "config loaded");
    let mut app = app::App::new(api, &config);
    app.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from([
            "procwatch",
            "--url",
            "http://h:1",
            "--interval-ms",
            "10",
            "--no-auto-refresh",
            "--sort",
            "name",
            "--order",
            "asc",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.base_url, "http://h:1");
        assert_eq!(config.poll_interval_ms, MIN_POLL_INTERVAL_MS);
        assert!(!config.auto_refresh);
        assert_eq!(config.sort, SortField::Name);
        assert_eq!(config.order, SortOrder::Asc);
    }

    #[test]
    fn cli_rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["procwatch", "--sort", "disk"]).is_err());
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::parse_from(["procwatch"]);
        let mut config = Config::default();
        config.theme = "nord".to_string();
        cli.apply(&mut config);
        assert_eq!(config.theme, "nord");
        assert!(config.auto_refresh);
    }
}

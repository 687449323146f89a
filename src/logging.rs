use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::constants::DEFAULT_LOG_DIRECTIVE;

/// Initialize JSON logging to `path`.
///
/// The terminal belongs to the TUI, so events never go to stderr.
/// `RUST_LOG` refines the filter; `procwatch=info` applies when unset.
pub fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(env_filter()?)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

fn env_filter() -> Result<EnvFilter> {
    let directive = DEFAULT_LOG_DIRECTIVE
        .parse::<Directive>()
        .context("invalid default log directive")?;
    Ok(EnvFilter::from_default_env().add_directive(directive))
}

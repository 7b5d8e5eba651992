//! Tracing setup for chef runs.
//!
//! A run appends to `simchef.log` in the XDG state directory so the history
//! of fetches and packaging survives between invocations. `RUST_LOG`
//! overrides the default filter.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,simchef_core=debug,simchef_cli=debug";
const LOG_FILE: &str = "simchef.log";

/// Run log sink. Each event gets its own handle to the log file; if the
/// handle can't be duplicated the event is written to stderr instead.
struct RunLog(File);

enum RunLogWriter {
    File(File),
    Stderr(io::Stderr),
}

impl io::Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            RunLogWriter::File(f) => f.write(buf),
            RunLogWriter::Stderr(e) => e.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            RunLogWriter::File(f) => f.flush(),
            RunLogWriter::Stderr(e) => e.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for RunLog {
    type Writer = RunLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => RunLogWriter::File(f),
            Err(_) => RunLogWriter::Stderr(io::stderr()),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// `$XDG_STATE_HOME/simchef/simchef.log` (usually `~/.local/state/simchef/simchef.log`).
pub fn log_file_path() -> Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("simchef").context("resolve XDG dirs")?;
    Ok(dirs.get_state_home().join("simchef").join(LOG_FILE))
}

/// Send chef events to the run log. Errors if the log can't be opened or a
/// subscriber is already installed; `main` then calls [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create log dir: {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open run log: {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(RunLog(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("install subscriber: {}", e))?;

    tracing::info!("run log: {}", path.display());
    Ok(())
}

/// Send chef events to stderr.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

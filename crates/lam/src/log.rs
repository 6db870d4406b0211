//! Logging for lam.
use anyhow::Context;
use lam_core::config::log_file_path;
use std::io::LineWriter;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::OffsetTime;

const DEFAULT_FILTER: &str = "lam=debug,lam_core=debug,rustyline=info";
const MAX_LOG_BYTES: u64 = 100 * 1024;

/// Moves `log_path` aside to `<log_path>.old` once it grows past `max_bytes`.
fn rotate_log(log_path: &Path, max_bytes: u64) -> std::io::Result<()> {
    let size = match std::fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if size > max_bytes {
        let backup_path = log_path.with_extension("log.old");
        if backup_path.exists() {
            std::fs::remove_file(&backup_path)?;
        }
        std::fs::rename(log_path, backup_path)?;
    }
    Ok(())
}

/// Writes relay and REPL traces to `lam.log` in the data directory.
///
/// `RUST_LOG` replaces the default filter when set.
pub fn setup_logging() -> anyhow::Result<()> {
    let log_path = log_file_path().context("Failed to locate log file")?;
    rotate_log(&log_path, MAX_LOG_BYTES).context("Failed to rotate log file")?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open {}", log_path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(LineWriter::new(log_file)))
        .with_ansi(false)
        .with_timer(OffsetTime::local_rfc_3339()?)
        .init();
    Ok(())
}

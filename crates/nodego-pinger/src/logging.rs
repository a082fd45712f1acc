//! Tracing setup: stderr always, plus an optional per-run log file.

use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str =
    "warn,ngp_core=info,ngp_client=info,ngp_config=info,ngp_scheduler=info,nodego_pinger=info";

/// Create a run-specific log writer in `{log_dir}/run-{timestamp}.log`.
///
/// The returned guard must stay alive for as long as logs should be flushed.
pub fn create_run_log_writer(log_dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_name = format!("run-{}.log", Local::now().format("%Y%m%d-%H%M%S"));
    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = create_run_log_writer(dir)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .ok();

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_create_run_log_writer_creates_file() {
        let tmp = tempfile::tempdir().expect("Failed to create tempdir");
        let log_dir = tmp.path().join("logs");

        let (writer, _guard) = create_run_log_writer(&log_dir).expect("Should create log writer");

        let entries: Vec<_> = std::fs::read_dir(&log_dir)
            .expect("Should read log dir")
            .collect();
        assert_eq!(entries.len(), 1, "Exactly one log file should be created");

        let name = entries[0]
            .as_ref()
            .expect("Should read entry")
            .file_name()
            .to_string_lossy()
            .to_string();
        let stem = name
            .strip_prefix("run-")
            .and_then(|s| s.strip_suffix(".log"))
            .expect("run-<timestamp>.log");
        assert_eq!(stem.len(), 15, "Timestamp should be YYYYMMDD-HHMMSS: got '{stem}'");
        assert_eq!(stem.chars().nth(8), Some('-'));

        drop(writer);
    }

    #[test]
    fn test_create_run_log_writer_error_on_invalid_path() {
        let bad_path = PathBuf::from("/dev/null/impossible/path");
        assert!(create_run_log_writer(&bad_path).is_err());
    }
}

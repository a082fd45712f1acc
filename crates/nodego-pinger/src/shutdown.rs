use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use ngp_scheduler::{ProgressEvent, Reporter};

/// Resolve on Ctrl-C, or SIGTERM on unix.
pub async fn wait_for_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res.context("Failed to listen for Ctrl-C")?,
            _ = sigterm.recv() => info!("received SIGTERM"),
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")?;
    }
    Ok(())
}

/// Cancel `token` on the first shutdown signal and announce it.
pub fn spawn_signal_listener(
    token: CancellationToken,
    reporter: Arc<dyn Reporter>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = wait_for_signal() => {
                if let Err(e) = res {
                    warn!("signal handling unavailable: {e:#}");
                    return;
                }
                reporter.report(&ProgressEvent::ShutdownRequested);
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}

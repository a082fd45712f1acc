use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod banner;
mod cli;
mod console;
mod listing;
mod logging;
mod shutdown;

use cli::{Cli, Commands, OutputFormat, RunArgs};
use console::ConsoleReporter;
use ngp_client::HttpClientFactory;
use ngp_config::{AppConfig, load_roster};
use ngp_core::TASK_CATALOGUE;
use ngp_scheduler::{Orchestrator, Reporter, Schedule};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.format;

    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Run(RunArgs::default())) {
        Commands::Tasks => {
            print!("{}", listing::render_tasks(&TASK_CATALOGUE, format)?);
            Ok(())
        }
        Commands::Run(args) => {
            apply_overrides(&mut config, &args);
            config.validate()?;
            let _log_guard = logging::init_logging(config.log_dir.as_deref())?;
            handle_run(config, args.dry_run, format).await
        }
    }
}

fn apply_overrides(config: &mut AppConfig, args: &RunArgs) {
    if let Some(path) = &args.accounts {
        config.files.accounts = path.clone();
    }
    if let Some(path) = &args.proxies {
        config.files.proxies = path.clone();
    }
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }
    if let Some(dir) = &args.log_dir {
        config.log_dir = Some(dir.clone());
    }
}

async fn handle_run(config: AppConfig, dry_run: bool, format: OutputFormat) -> Result<()> {
    let roster = load_roster(&config.files.accounts, &config.files.proxies)?;
    if roster.is_empty() {
        bail!(
            "No accounts found in {}; add one bearer token per line",
            config.files.accounts.display()
        );
    }

    if dry_run {
        print!("{}", listing::render_roster(&roster, format)?);
        return Ok(());
    }

    banner::print_banner();
    info!(
        accounts = roster.len(),
        routed = roster.iter().filter(|a| a.route.is_some()).count(),
        base_url = %config.api.base_url,
        "roster loaded"
    );

    let reporter: Arc<dyn Reporter> = Arc::new(ConsoleReporter::stdout());
    let schedule = Schedule {
        claim_delay: config.schedule.claim_delay(),
        cycle_delay: config.schedule.cycle_delay(),
    };
    let factory = HttpClientFactory::new(config.client_settings());
    let orchestrator = Orchestrator::new(roster, factory, schedule, Arc::clone(&reporter));

    let cancel = CancellationToken::new();
    let listener = shutdown::spawn_signal_listener(cancel.clone(), reporter);
    let grace = config.schedule.shutdown_grace();

    tokio::select! {
        summary = orchestrator.run(&cancel) => {
            let onboarded = summary.onboarding.iter().filter(|r| r.completed()).count();
            info!(
                onboarded,
                accounts = summary.onboarding.len(),
                cycles = summary.cycles.len(),
                "stopped"
            );
        }
        _ = async {
            cancel.cancelled().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!("shutdown grace of {}ms elapsed; abandoning in-flight requests", grace.as_millis());
        }
    }

    cancel.cancel();
    listener.await.ok();
    Ok(())
}

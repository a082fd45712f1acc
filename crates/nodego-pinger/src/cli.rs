use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ngp", version)]
#[command(about = "NodeGo multi-account pinger: check-in, task claims and node keep-alive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to ~/.config/nodego-pinger/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for listings (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Onboard every account, then ping until interrupted (default)
    Run(RunArgs),

    /// List the claimable task catalogue
    Tasks,
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Credentials file, one bearer token per line
    #[arg(long)]
    pub accounts: Option<PathBuf>,

    /// Proxies file, paired with accounts by line
    #[arg(long)]
    pub proxies: Option<PathBuf>,

    /// API base URL override
    #[arg(long)]
    pub base_url: Option<String>,

    /// Also write logs to run-<timestamp>.log in this directory
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Print the account/proxy pairing and exit without contacting the API
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

//! Account roster loading.
//!
//! Credentials and proxies come from plain line-delimited files. Blank lines
//! are dropped, the rest are trimmed, and account *i* is paired with proxy
//! line *i* when one exists.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

use ngp_core::{Account, Credential, ProxyRoute};

/// Read a line-delimited file, dropping blank lines and trimming the rest.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Pair credentials with proxies by position. Invalid proxy lines leave that
/// account without a route.
pub fn pair_roster(tokens: Vec<String>, proxies: &[String]) -> Vec<Account> {
    if proxies.len() > tokens.len() {
        warn!(
            "{} proxy line(s) have no matching account and will be unused",
            proxies.len() - tokens.len()
        );
    }

    tokens
        .into_iter()
        .enumerate()
        .map(|(index, token)| {
            let route = proxies.get(index).and_then(|raw| ProxyRoute::classify(raw));
            Account::new(index, Credential::new(token), route)
        })
        .collect()
}

/// Load the roster. The accounts file is mandatory; a missing proxies file
/// means every account goes direct.
pub fn load_roster(accounts_path: &Path, proxies_path: &Path) -> Result<Vec<Account>> {
    let tokens = read_lines(accounts_path).context("Error reading accounts")?;

    let proxies = if proxies_path.exists() {
        read_lines(proxies_path).context("Error reading proxies")?
    } else {
        Vec::new()
    };

    let roster = pair_roster(tokens, &proxies);
    let routed = roster.iter().filter(|a| a.route.is_some()).count();
    info!(
        "Loaded {} account(s), {} with a proxy route",
        roster.len(),
        routed
    );
    Ok(roster)
}

//! Output for `ngp tasks` and `ngp run --dry-run`.

use anyhow::Result;
use serde::Serialize;

use ngp_core::{Account, TaskDefinition};

use crate::cli::OutputFormat;

#[derive(Debug, Serialize)]
struct RouteView {
    kind: &'static str,
    endpoint: String,
}

/// Roster entry as shown to the operator. Never carries the full token.
#[derive(Debug, Serialize)]
struct AccountView {
    account: usize,
    credential: String,
    route: Option<RouteView>,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            account: account.index + 1,
            credential: account.credential.redacted(),
            route: account.route.as_ref().map(|r| RouteView {
                kind: r.kind().as_str(),
                endpoint: r.endpoint(),
            }),
        }
    }
}

pub fn render_roster(roster: &[Account], format: OutputFormat) -> Result<String> {
    let views: Vec<AccountView> = roster.iter().map(AccountView::from).collect();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&views)?),
        OutputFormat::Text => {
            let mut out = format!("{} account(s) loaded\n", views.len());
            for view in &views {
                let route = match &view.route {
                    Some(r) => format!("{} ({})", r.endpoint, r.kind),
                    None => "direct".to_string(),
                };
                out.push_str(&format!(
                    "  #{:<3} {:<12} -> {route}\n",
                    view.account, view.credential
                ));
            }
            Ok(out)
        }
    }
}

pub fn render_tasks(catalogue: &[TaskDefinition], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(catalogue)?),
        OutputFormat::Text => Ok(catalogue
            .iter()
            .map(|t| format!("{:<6}{}\n", t.code, t.display_name))
            .collect()),
    }
}

//! Application configuration (`~/.config/nodego-pinger/config.toml`).
//!
//! Every key is optional; a missing file yields the defaults. Command-line
//! flags are applied on top by the binary.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ngp_client::{ClientSettings, DEFAULT_BASE_URL};

/// Floors for the pacing knobs; config may slow the run down, never speed it up.
pub const MIN_PING_SPACING_MS: u64 = 3000;
pub const MIN_CLAIM_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSection,
    #[serde(default)]
    pub schedule: ScheduleSection,
    #[serde(default)]
    pub files: FilesSection,
    /// Directory for a per-run log file. None = stderr only.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Pacing knobs, all in milliseconds. Ping spacing and claim delay are lower
/// bounds: values below the floors are rejected by [`AppConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSection {
    #[serde(default = "default_ping_spacing_ms")]
    pub ping_spacing_ms: u64,
    #[serde(default = "default_claim_delay_ms")]
    pub claim_delay_ms: u64,
    #[serde(default = "default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            ping_spacing_ms: default_ping_spacing_ms(),
            claim_delay_ms: default_claim_delay_ms(),
            cycle_delay_ms: default_cycle_delay_ms(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

impl ScheduleSection {
    pub fn ping_spacing(&self) -> Duration {
        Duration::from_millis(self.ping_spacing_ms)
    }

    pub fn claim_delay(&self) -> Duration {
        Duration::from_millis(self.claim_delay_ms)
    }

    pub fn cycle_delay(&self) -> Duration {
        Duration::from_millis(self.cycle_delay_ms)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilesSection {
    #[serde(default = "default_accounts_path")]
    pub accounts: PathBuf,
    #[serde(default = "default_proxies_path")]
    pub proxies: PathBuf,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            accounts: default_accounts_path(),
            proxies: default_proxies_path(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_ping_spacing_ms() -> u64 {
    MIN_PING_SPACING_MS
}

fn default_claim_delay_ms() -> u64 {
    MIN_CLAIM_DELAY_MS
}

fn default_cycle_delay_ms() -> u64 {
    15000
}

fn default_shutdown_grace_ms() -> u64 {
    1000
}

fn default_accounts_path() -> PathBuf {
    PathBuf::from("data.txt")
}

fn default_proxies_path() -> PathBuf {
    PathBuf::from("proxies.txt")
}

impl AppConfig {
    /// Load from an explicit path (must exist) or from the default location
    /// (missing file = defaults).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => {
                if !p.exists() {
                    bail!("Config file not found: {}", p.display());
                }
                p.to_path_buf()
            }
            None => match Self::config_path() {
                Ok(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Path to the default config file: `~/.config/nodego-pinger/config.toml`.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "nodego-pinger")
            .context("Failed to determine config directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid api.base_url '{}'", self.api.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "api.base_url must use http or https, got '{}'",
                url.scheme()
            );
        }
        if self.api.request_timeout_secs == 0 {
            bail!("api.request_timeout_secs must be greater than zero");
        }
        if self.api.connect_timeout_secs == 0 {
            bail!("api.connect_timeout_secs must be greater than zero");
        }
        if self.schedule.ping_spacing_ms < MIN_PING_SPACING_MS {
            bail!(
                "schedule.ping_spacing_ms must be at least {MIN_PING_SPACING_MS}, got {}",
                self.schedule.ping_spacing_ms
            );
        }
        if self.schedule.claim_delay_ms < MIN_CLAIM_DELAY_MS {
            bail!(
                "schedule.claim_delay_ms must be at least {MIN_CLAIM_DELAY_MS}, got {}",
                self.schedule.claim_delay_ms
            );
        }
        if self.schedule.cycle_delay_ms == 0 {
            bail!("schedule.cycle_delay_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api.base_url.clone(),
            request_timeout: Duration::from_secs(self.api.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.api.connect_timeout_secs),
            ping_spacing: self.schedule.ping_spacing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://nodego.ai/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.schedule.ping_spacing(), Duration::from_millis(3000));
        assert_eq!(config.schedule.claim_delay(), Duration::from_millis(1000));
        assert_eq!(config.schedule.cycle_delay(), Duration::from_millis(15000));
        assert_eq!(config.schedule.shutdown_grace(), Duration::from_millis(1000));
        assert_eq!(config.files.accounts, PathBuf::from("data.txt"));
        assert_eq!(config.files.proxies, PathBuf::from("proxies.txt"));
        assert!(config.log_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
log_dir = "/var/log/ngp"

[schedule]
cycle_delay_ms = 60000

[files]
accounts = "tokens.txt"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.schedule.cycle_delay_ms, 60000);
        assert_eq!(config.schedule.ping_spacing_ms, 3000);
        assert_eq!(config.files.accounts, PathBuf::from("tokens.txt"));
        assert_eq!(config.files.proxies, PathBuf::from("proxies.txt"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/ngp")));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[schedule\ncycle_delay_ms = ").unwrap();
        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://nodego.ai".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.connect_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.schedule.cycle_delay_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_ping_spacing_below_floor() {
        let config: AppConfig = toml::from_str("[schedule]\nping_spacing_ms = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("schedule.ping_spacing_ms"));

        let mut config = AppConfig::default();
        config.schedule.ping_spacing_ms = MIN_PING_SPACING_MS - 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_claim_delay_below_floor() {
        let config: AppConfig = toml::from_str("[schedule]\nclaim_delay_ms = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("schedule.claim_delay_ms"));

        let mut config = AppConfig::default();
        config.schedule.claim_delay_ms = 999;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_slower_pacing() {
        let config: AppConfig =
            toml::from_str("[schedule]\nping_spacing_ms = 5000\nclaim_delay_ms = 2500").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.ping_spacing(), Duration::from_millis(5000));
        assert_eq!(config.schedule.claim_delay(), Duration::from_millis(2500));
    }

    #[test]
    fn test_client_settings_carry_timeout_and_spacing() {
        let mut config = AppConfig::default();
        config.schedule.ping_spacing_ms = 4500;
        let settings = config.client_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.ping_spacing, Duration::from_millis(4500));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use devlogs_core::LockoutPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DevlogsConfig {
    #[serde(default)]
    pub accounts: AccountsSection,
    #[serde(default)]
    pub lockout: LockoutSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AccountsSection {
    pub dir: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutSection {
    pub max_attempts: u32,
    pub base_delay_seconds: u64,
    pub delay_increment_seconds: u64,
}

impl Default for LockoutSection {
    fn default() -> Self {
        let policy = LockoutPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_seconds: policy.base_delay.as_secs(),
            delay_increment_seconds: policy.delay_increment.as_secs(),
        }
    }
}

impl DevlogsConfig {
    pub fn lockout_policy(&self) -> anyhow::Result<LockoutPolicy> {
        if self.lockout.max_attempts == 0 {
            return Err(anyhow::anyhow!("lockout.max_attempts must be at least 1"));
        }
        Ok(LockoutPolicy {
            max_attempts: self.lockout.max_attempts,
            base_delay: Duration::from_secs(self.lockout.base_delay_seconds),
            delay_increment: Duration::from_secs(self.lockout.delay_increment_seconds),
        })
    }

    /// Accounts directory: explicit flag, then config, then the XDG data dir.
    pub fn accounts_dir(&self, flag: Option<&Path>) -> anyhow::Result<PathBuf> {
        if let Some(dir) = flag {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = self.accounts.dir.as_deref() {
            if !dir.trim().is_empty() {
                return expand_home(dir);
            }
        }
        default_accounts_dir()
    }
}

/// Load the config at `explicit`, or the default location.
///
/// A missing default file yields the defaults; a missing explicit file is an
/// error.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<DevlogsConfig> {
    match explicit {
        Some(path) => read_config(path),
        None => {
            let path = default_config_path()?;
            if path.exists() {
                read_config(&path)
            } else {
                Ok(DevlogsConfig::default())
            }
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_accounts_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("accounts"))
}

pub fn read_config(path: &Path) -> anyhow::Result<DevlogsConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("devlogs"));
        }
    }
    Ok(home_dir()?.join(".config").join("devlogs"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("devlogs"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("devlogs"))
}

fn expand_home(path: &str) -> anyhow::Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

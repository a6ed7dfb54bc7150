use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use roster_seeker::DEFAULT_PAGE_SIZE;

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "Roster";
const APP_NAME: &str = "roster";

/// Environment variable naming the config file; `--config` wins over it.
pub const CONFIG_ENV: &str = "ROSTER_CONFIG";

pub struct ConfigLoader {
    config_file: PathBuf,
}

impl ConfigLoader {
    /// Resolves the config file: explicit path, then `ROSTER_CONFIG`, then
    /// `config.toml` in the platform config directory.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::at(path));
        }
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Ok(Self::at(PathBuf::from(path)));
        }
        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;
        Ok(Self::at(project_dirs.config_dir().join("config.toml")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: path.into(),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Reads the config. A missing file yields the defaults.
    pub fn load(&self) -> Result<RosterConfig> {
        if !self.config_file.exists() {
            tracing::debug!(path = %self.config_file.display(), "no config file, using defaults");
            return Ok(RosterConfig::default());
        }
        let raw = fs::read_to_string(&self.config_file)
            .with_context(|| format!("reading config {}", self.config_file.display()))?;
        let cfg: RosterConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing config toml {}", self.config_file.display()))?;
        cfg.validate()?;
        tracing::debug!(path = %self.config_file.display(), ?cfg, "loaded config");
        Ok(cfg)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Records per page in listings.
    pub page_size: usize,
    /// Directory exports are written to when no `--out` is given.
    pub export_dir: Option<PathBuf>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            export_dir: None,
        }
    }
}

impl RosterConfig {
    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        Ok(())
    }
}

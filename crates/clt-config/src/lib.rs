//! clt-config
//!
//! YAML configuration for clubtrack. A config file names the operator's
//! contact details (sent in the API `User-Agent`, as the public API asks of
//! automated clients), the clubs being tracked, and where roster CSVs live.
//!
//! Configuration problems are reported before any network call is made.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use clt_schemas::club_url_name;

/// Default config location relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/clubtrack.yml";

const DEFAULT_DATA_DIR: &str = "data";

/// Top-level configuration document.
///
/// Unknown keys are rejected at parse time so a typoed key fails loudly
/// instead of being silently ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Contact email for the API `User-Agent` header.
    pub email: String,
    /// Operator's chess.com username, also sent in the header.
    pub username: String,
    /// Club used when no `--club` is given. Defaults to the first entry
    /// of `clubs`.
    #[serde(default)]
    pub default_club: Option<String>,
    /// Url-names of every club being tracked.
    #[serde(default)]
    pub clubs: Vec<String>,
    /// Root directory for persisted rosters. Defaults to `data`.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw).context("invalid config yaml")?;
        Ok(cfg)
    }

    /// Pick the club to operate on: the explicit request, else the
    /// configured default, else the first configured club. Any club that
    /// is not in `clubs` is a configuration error.
    pub fn resolve_club(&self, requested: Option<&str>) -> Result<String> {
        let candidate = match requested {
            Some(r) => club_url_name(r),
            None => match self.default_club.as_deref().or(self.clubs.first().map(String::as_str)) {
                Some(d) => d.to_string(),
                None => bail!("no club specified and none configured"),
            },
        };

        if !self.clubs.iter().any(|c| *c == candidate) {
            bail!(
                "club '{}' is not configured (known clubs: {})",
                candidate,
                self.clubs.join(", ")
            );
        }
        Ok(candidate)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Identifying `User-Agent` value for API requests.
    pub fn user_agent(&self) -> String {
        format!(
            "clubtrack (username: {}; contact: {})",
            self.username, self.email
        )
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::http::CurlClient;
use crate::invocation::DEFAULT_CONTENT_TYPE;

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// Global configuration loaded from `~/.config/rimx/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RimxConfig {
    /// Directory of the local image store. Defaults to `~/.local/share/rimx/images`.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
    /// Endpoint used by `rimx post` when none is given on the command line.
    #[serde(default)]
    pub default_endpoint: Option<String>,
    /// User-Agent sent with every request. None = `rimx/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Content type of the uploaded `image` part.
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

impl Default for RimxConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            default_endpoint: None,
            user_agent: None,
            content_type: default_content_type(),
        }
    }
}

impl RimxConfig {
    /// Store directory from config, else the XDG data dir.
    pub fn resolved_store_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.store_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix("rimx")?;
        Ok(xdg_dirs.get_data_home().join("images"))
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("rimx/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn http_client(&self) -> CurlClient {
        CurlClient::new(Some(self.user_agent()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rimx")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RimxConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RimxConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: RimxConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Datasource configuration loaded from `~/.config/vlq/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceConfig {
    /// Base URL of the log-search service; endpoint paths are joined onto it.
    pub url: String,
    /// Query-string parameters forwarded with every request (e.g. `AccountID=1&ProjectID=0`).
    #[serde(default)]
    pub query_params: String,
    /// Line cap for instant queries when none is given on the command line.
    #[serde(default)]
    pub max_lines: Option<i64>,
}

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9428".to_string(),
            query_params: String::new(),
            max_lines: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vlq")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DatasourceConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DatasourceConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<DatasourceConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: DatasourceConfig = toml::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(cfg)
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::task::TaskKind;

/// Equality filter applied to JSON records (`[filter]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Field compared on each record.
    pub field: String,
    /// Value the field must equal (compared as a string).
    pub value: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            field: "priority".to_string(),
            value: "high".to_string(),
        }
    }
}

/// CSV report layout (`[report]` section).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Header and column order of every report.
    pub columns: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: vec!["ID".into(), "Name".into(), "Status".into()],
        }
    }
}

/// Global configuration loaded from `~/.config/fanout/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Directory every artifact is written into.
    pub output_dir: PathBuf,
    /// Worker pool size for download batches.
    pub download_workers: usize,
    /// Worker pool size for filter batches.
    pub filter_workers: usize,
    /// Timeout for a single HTTP GET, in seconds.
    pub fetch_timeout_secs: u64,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            download_workers: 4,
            filter_workers: 4,
            fetch_timeout_secs: 10,
            filter: FilterConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl FanoutConfig {
    /// Per-GET timeout, at least one second (libcurl reads 0 as "no timeout").
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs.max(1))
    }

    /// Pool size for a batch of `kind`. Reports always run on one worker.
    pub fn workers_for(&self, kind: TaskKind) -> usize {
        match kind {
            TaskKind::Download => self.download_workers.max(1),
            TaskKind::FilterRecords => self.filter_workers.max(1),
            TaskKind::WriteReport => 1,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fanout")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FanoutConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FanoutConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FanoutConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

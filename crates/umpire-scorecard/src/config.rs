// Configuration loading and parsing (config/scorecard.toml).

use crate::ranking::metric::{default_metrics, MetricSpec};
use crate::ranking::percentile::RankScale;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Minimum career pitches called for an umpire to be ranked.
pub const DEFAULT_MIN_PITCHES_CALLED: f64 = 29500.0;

const CONFIG_FILE: &str = "scorecard.toml";
const MAX_DECIMALS: u32 = 12;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_paths: DataPaths,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub games: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            games: "data/games.csv".into(),
        }
    }
}

/// Qualification threshold and the metrics that make up the composite.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub min_pitches_called: f64,
    pub scale: RankScale,
    pub metrics: Vec<MetricSpec>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_pitches_called: DEFAULT_MIN_PITCHES_CALLED,
            scale: RankScale::default(),
            metrics: default_metrics(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub enabled: bool,
    pub summary: String,
    pub ranked: String,
    pub decimals: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            summary: "data/ump_totals.csv".into(),
            ranked: "data/seasoned_umps.csv".into(),
            decimals: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Umpires to print a comparison table for.
    pub spotlight: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate configuration text.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load and validate `config/scorecard.toml` relative to `base_dir`.
///
/// This does not auto-copy defaults. Prefer `load_config()` which handles
/// default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Copy `defaults/scorecard.toml` to `config/` if the config file is absent.
/// Returns the files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let target = config_dir.join(CONFIG_FILE);

    if target.exists() {
        return Ok(Vec::new());
    }

    let source = defaults_dir.join(CONFIG_FILE);
    if !source.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither {} nor {} exists",
                    config_dir.display(),
                    defaults_dir.display()
                ),
            });
        }
        // config/ exists without the file; load will report FileNotFound
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create {}: {e}", config_dir.display()),
    })?;
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!(
            "failed to copy {} to {}: {e}",
            source.display(),
            target.display()
        ),
    })?;
    Ok(vec![target])
}

/// Load config from the current working directory, seeding it from
/// `defaults/` on first run.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let ranking = &config.ranking;
    let threshold = ranking.min_pitches_called;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "ranking.min_pitches_called".into(),
            message: format!("must be a finite number >= 0, got {threshold}"),
        });
    }

    if ranking.metrics.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "ranking.metrics".into(),
            message: "at least one metric is required".into(),
        });
    }

    let mut seen = HashSet::new();
    for spec in &ranking.metrics {
        if !seen.insert(spec.field) {
            return Err(ConfigError::ValidationError {
                field: "ranking.metrics".into(),
                message: format!("metric `{}` listed more than once", spec.field.label()),
            });
        }
    }

    if config.export.decimals > MAX_DECIMALS {
        return Err(ConfigError::ValidationError {
            field: "export.decimals".into(),
            message: format!("must be <= {MAX_DECIMALS}, got {}", config.export.decimals),
        });
    }

    if config.data_paths.games.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.games".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

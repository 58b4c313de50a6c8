// Configuration loading and parsing (config/league.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use gridcast_core::RosterSlotKind;

use crate::presets;

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
// league.toml structs
// ---------------------------------------------------------------------------

/// The assembled configuration for one simulated draft.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub league: LeagueConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub bots: BotConfig,
    pub data: DataPaths,
    /// Directory the config was loaded from; data paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub owners: usize,
    pub money: u32,
    /// How much the starting lineup counts against the bench, in [0, 1].
    pub starter_weight: f64,
    /// Ordered roster slot labels (e.g. "QB", "WR/RB/TE", "BN"). When
    /// omitted, the standard 15-slot roster is used.
    #[serde(default)]
    pub roster: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftConfig {
    /// Seed for tie-breaking between equal bids. Unset means a fresh random
    /// seed every run.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Safety cap on the number of ticks before the run is abandoned.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: usize,
    #[serde(default)]
    pub report: ReportFormat,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            seed: None,
            max_ticks: default_max_ticks(),
            report: ReportFormat::default(),
        }
    }
}

fn default_max_ticks() -> usize {
    100_000
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Multiplier on a player's value giving the most a bot will pay.
    #[serde(default = "default_value_scale")]
    pub value_scale: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        BotConfig {
            value_scale: default_value_scale(),
        }
    }
}

fn default_value_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub cheatsheet: String,
}

impl Config {
    /// The roster template every owner starts from.
    pub fn roster_template(&self) -> Result<Vec<RosterSlotKind>, ConfigError> {
        match &self.league.roster {
            None => Ok(presets::default_roster()),
            Some(labels) => labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    RosterSlotKind::from_label(label).ok_or_else(|| ConfigError::ValidationError {
                        field: format!("league.roster[{i}]"),
                        message: format!("unknown roster slot `{label}`"),
                    })
                })
                .collect(),
        }
    }

    /// Cheatsheet path, resolved against the config's base directory.
    pub fn cheatsheet_path(&self) -> PathBuf {
        self.base_dir.join(&self.data.cheatsheet)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` relative to the
/// given `base_dir`. Defaults are not copied; call [`ensure_config_files`]
/// first.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = base_dir.join("config").join("league.toml");
    let text = read_file(&league_path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: league_path.clone(),
        source: e,
    })?;
    config.base_dir = base_dir.to_path_buf();

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // Never overwrite a user's edited config.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
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
    if config.league.owners == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.owners".into(),
            message: "must be greater than 0".into(),
        });
    }

    let weight = config.league.starter_weight;
    if !(0.0..=1.0).contains(&weight) {
        return Err(ConfigError::ValidationError {
            field: "league.starter_weight".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {weight}"),
        });
    }

    let roster = config.roster_template()?;
    if roster.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "league.roster".into(),
            message: "must contain at least one slot".into(),
        });
    }

    // Every slot costs at least $1.
    if (config.league.money as usize) < roster.len() {
        return Err(ConfigError::ValidationError {
            field: "league.money".into(),
            message: format!(
                "must be at least the roster size ({}), got {}",
                roster.len(),
                config.league.money
            ),
        });
    }

    if config.draft.max_ticks == 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.max_ticks".into(),
            message: "must be > 0".into(),
        });
    }

    let scale = config.bots.value_scale;
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "bots.value_scale".into(),
            message: format!("must be > 0, got {scale}"),
        });
    }

    if config.data.cheatsheet.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.cheatsheet".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

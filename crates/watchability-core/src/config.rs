// watchability.toml and credentials.toml: loading, default seeding, validation.

use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Environment variable that overrides `anthropic_api_key` from credentials.toml.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

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

    #[error("could not seed config/ from defaults/: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub data_paths: DataPaths,
    pub schedule: ScheduleConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub credentials: CredentialsConfig,
}

// ---------------------------------------------------------------------------
// watchability.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire watchability.toml file.
#[derive(Debug, Clone, Deserialize)]
struct WatchabilityFile {
    scoring: ScoringConfig,
    data_paths: DataPaths,
    schedule: ScheduleConfig,
    llm: LlmConfig,
    output: OutputConfig,
}

/// Constant terms of the tNERD and pNERD formulas.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    pub team_constant: f64,
    pub pitcher_constant: f64,
    /// Starters below this many innings are left out of the pitcher population.
    #[serde(default = "default_min_innings_pitched")]
    pub min_innings_pitched: f64,
}

fn default_min_innings_pitched() -> f64 {
    20.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    /// Root holding one subdirectory of CSV exports per season.
    pub stats_dir: String,
    /// Schedule-name to stats-name alias CSV.
    pub name_mapping: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub base_url: String,
    /// IANA zone for displayed start times.
    pub timezone: String,
    pub timeout_secs: u64,
}

impl ScheduleConfig {
    /// Parsed display timezone.
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| ConfigError::ValidationError {
                field: "schedule.timezone".into(),
                message: format!("unknown timezone '{}': {e}", self.timezone),
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub cheap_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    #[serde(default = "default_true")]
    pub include_web_search: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

// ---------------------------------------------------------------------------
// credentials.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CredentialsConfig {
    pub anthropic_api_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read `config/watchability.toml` and, when present, `config/credentials.toml`
/// under `base_dir`, then validate the result.
///
/// Pure file loading: no defaults are seeded and the environment is ignored.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let WatchabilityFile {
        scoring,
        data_paths,
        schedule,
        llm,
        output,
    } = parse_toml(&config_dir.join("watchability.toml"))?;

    let credentials_path = config_dir.join("credentials.toml");
    let credentials: CredentialsConfig = if credentials_path.exists() {
        parse_toml(&credentials_path)?
    } else {
        CredentialsConfig::default()
    };

    let config = Config {
        scoring,
        data_paths,
        schedule,
        llm,
        output,
        credentials,
    };
    validate(&config)?;
    Ok(config)
}

/// Copy every file in `defaults/` that has no counterpart in `config/`.
///
/// `*.example` files stay behind. Returns the paths written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        return if config_dir.exists() {
            Ok(Vec::new())
        } else {
            Err(seed_error(format!(
                "{} has neither defaults/ nor config/; run from the project root",
                base_dir.display()
            )))
        };
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| seed_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut sources = Vec::new();
    for entry in std::fs::read_dir(&defaults_dir)
        .map_err(|e| seed_error(format!("cannot list {}: {e}", defaults_dir.display())))?
    {
        let path = entry.map_err(|e| seed_error(e.to_string()))?.path();
        let is_example = path.extension().is_some_and(|ext| ext == "example");
        if path.is_file() && !is_example {
            sources.push(path);
        }
    }

    let mut copied = Vec::new();
    for source in sources {
        let Some(name) = source.file_name() else {
            continue;
        };
        let target = config_dir.join(name);
        if copy_if_absent(&source, &target)? {
            copied.push(target);
        }
    }
    Ok(copied)
}

/// `Ok(false)` when `target` already exists; it is left untouched.
fn copy_if_absent(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    use std::io::Write;

    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(seed_error(format!("cannot create {}: {e}", target.display()))),
    };
    let bytes = std::fs::read(source)
        .map_err(|e| seed_error(format!("cannot read {}: {e}", source.display())))?;
    dest.write_all(&bytes)
        .map_err(|e| seed_error(format!("cannot write {}: {e}", target.display())))?;
    Ok(true)
}

/// Config for the working directory: seeds missing files from `defaults/`
/// and lets `ANTHROPIC_API_KEY` override the stored key.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    for path in ensure_config_files(&cwd)? {
        info!("seeded {} from defaults", path.display());
    }
    let mut config = load_config_from(&cwd)?;
    config.credentials.anthropic_api_key = api_key_with_override(
        config.credentials.anthropic_api_key.take(),
        std::env::var(API_KEY_ENV).ok(),
    );
    Ok(config)
}

/// A non-blank environment value wins over the credentials file.
pub fn api_key_with_override(from_file: Option<String>, from_env: Option<String>) -> Option<String> {
    let non_blank = |k: Option<String>| k.filter(|s| !s.trim().is_empty());
    non_blank(from_env).or_else(|| non_blank(from_file))
}

fn parse_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

fn seed_error(message: String) -> ConfigError {
    ConfigError::DefaultsCopyError { message }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let constants: &[(&str, f64)] = &[
        ("scoring.team_constant", config.scoring.team_constant),
        ("scoring.pitcher_constant", config.scoring.pitcher_constant),
    ];
    for (name, val) in constants {
        if !val.is_finite() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite number, got {val}"),
            });
        }
    }

    let min_ip = config.scoring.min_innings_pitched;
    if !min_ip.is_finite() || min_ip < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "scoring.min_innings_pitched".into(),
            message: format!("must be a non-negative number, got {min_ip}"),
        });
    }

    if config.data_paths.stats_dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.stats_dir".into(),
            message: "must not be empty".into(),
        });
    }

    config.schedule.tz()?;

    if config.schedule.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "schedule.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.llm.max_tokens == 0 {
        return Err(ConfigError::ValidationError {
            field: "llm.max_tokens".into(),
            message: "must be greater than 0".into(),
        });
    }

    let temp = config.llm.temperature;
    if !(0.0..=1.0).contains(&temp) {
        return Err(ConfigError::ValidationError {
            field: "llm.temperature".into(),
            message: format!("must be between 0.0 and 1.0 inclusive, got {temp}"),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

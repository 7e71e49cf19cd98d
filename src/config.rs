//! Runtime configuration, read from the environment.
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_DB_PATH: &str = "educards.db";

pub const DB_PATH_VAR: &str = "EDUCARDS_DB";
pub const SHUFFLE_VAR: &str = "EDUCARDS_SHUFFLE";
pub const SEED_VAR: &str = "EDUCARDS_SEED";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{var} must be a boolean (1/0, true/false, yes/no, on/off), got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidSeed { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Whether new study sessions shuffle their cards.
    pub shuffle: bool,
    /// Fixed shuffle seed. Sessions draw a fresh seed when unset.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            shuffle: false,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from any variable lookup. Unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_PATH_VAR).filter(|p| !p.is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(SHUFFLE_VAR) {
            config.shuffle = parse_bool(SHUFFLE_VAR, &value)?;
        }
        if let Some(value) = lookup(SEED_VAR) {
            let seed = value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidSeed {
                var: SEED_VAR,
                value: value.clone(),
            })?;
            config.seed = Some(seed);
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}

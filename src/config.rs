use std::path::PathBuf;

use thiserror::Error;

use crate::data::insights::DEFAULT_TOP_N;

pub const DEFAULT_DATA_PATH: &str = "airbnb.csv";
pub const DATA_PATH_ENV: &str = "RENTAL_INSIGHTS_DATA";
pub const TOP_N_ENV: &str = "RENTAL_INSIGHTS_TOP_N";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },
}

/// Startup configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Dataset read once at startup.
    pub data_path: PathBuf,
    /// Length of the reviews-per-month ranking.
    pub top_n: usize,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: DEFAULT_TOP_N,
            window_size: [1280.0, 860.0],
        }
    }
}

impl AppConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Precedence: first positional argument, then environment, then defaults.
    pub fn resolve(
        mut args: impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = args.next().or_else(|| env(DATA_PATH_ENV)) {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = env(TOP_N_ENV) {
            config.top_n = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: TOP_N_ENV,
                    value: raw,
                })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::resolve(std::iter::empty(), env_of(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.data_path, PathBuf::from("airbnb.csv"));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_argument_beats_environment() {
        let env = env_of(&[(DATA_PATH_ENV, "/data/env.csv"), (TOP_N_ENV, "25")]);
        let args = vec!["listings.parquet".to_string()].into_iter();
        let config = AppConfig::resolve(args, env).unwrap();
        assert_eq!(config.data_path, PathBuf::from("listings.parquet"));
        assert_eq!(config.top_n, 25);

        let env = env_of(&[(DATA_PATH_ENV, "/data/env.csv")]);
        let config = AppConfig::resolve(std::iter::empty(), env).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/data/env.csv"));
    }

    #[test]
    fn test_invalid_top_n() {
        for bad in ["zero", "0", "-3"] {
            let err =
                AppConfig::resolve(std::iter::empty(), env_of(&[(TOP_N_ENV, bad)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidNumber {
                    key: TOP_N_ENV,
                    value: bad.to_string(),
                }
            );
        }
    }
}

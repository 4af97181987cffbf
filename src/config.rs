//! Runtime settings read from environment variables.

use crate::date::{self, DateFormats};
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:9000";
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected a number of seconds, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var}: invalid date format {value:?}")]
    InvalidDateFormat { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind: String,
    pub api_url: String,
    pub api_timeout: Duration,
    pub dates: DateFormats,
}

impl Config {
    /// Optional:
    /// - `MOVIES_ADMIN_BIND`: listen address, default `127.0.0.1:9000`
    /// - `MOVIES_API_URL`: REST base url, default `http://localhost:8080/api`
    /// - `MOVIES_API_TIMEOUT_SECS`: default 30
    /// - `MOVIES_APP_DATE_FORMAT`: strftime pattern for instants, default `%d/%m/%y %H:%M`
    /// - `MOVIES_APP_LOCAL_DATE_FORMAT`: strftime pattern for dates, default `%d/%m/%Y`
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let bind = lookup("MOVIES_ADMIN_BIND").unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let api_url = lookup("MOVIES_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        let api_timeout = match lookup("MOVIES_API_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: "MOVIES_API_TIMEOUT_SECS",
                value,
            })?,
            None => DEFAULT_API_TIMEOUT_SECS,
        };
        let dates = DateFormats {
            date_time: date_format(
                &lookup,
                "MOVIES_APP_DATE_FORMAT",
                date::DEFAULT_DATE_FORMAT,
                date::is_valid_date_time_format,
            )?,
            local_date: date_format(
                &lookup,
                "MOVIES_APP_LOCAL_DATE_FORMAT",
                date::DEFAULT_LOCAL_DATE_FORMAT,
                date::is_valid_local_date_format,
            )?,
        };
        Ok(Config {
            bind,
            api_url,
            api_timeout: Duration::from_secs(api_timeout),
            dates,
        })
    }
}

fn date_format<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    var: &'static str,
    default: &str,
    is_valid: fn(&str) -> bool,
) -> Result<String, ConfigError> {
    match lookup(var) {
        Some(value) if is_valid(&value) => Ok(value),
        Some(value) => Err(ConfigError::InvalidDateFormat { var, value }),
        None => Ok(default.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_timeout, Duration::from_secs(30));
        assert_eq!(config.dates, DateFormats::default());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("MOVIES_API_URL", "https://movies.example/api/"),
            ("MOVIES_API_TIMEOUT_SECS", "5"),
            ("MOVIES_APP_LOCAL_DATE_FORMAT", "%Y-%m-%d"),
        ])
        .unwrap();
        assert_eq!(config.api_url, "https://movies.example/api");
        assert_eq!(config.api_timeout, Duration::from_secs(5));
        assert_eq!(config.dates.local_date, "%Y-%m-%d");
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            config(&[("MOVIES_API_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidNumber {
                var: "MOVIES_API_TIMEOUT_SECS",
                value: "soon".to_owned()
            })
        );
        assert!(matches!(
            config(&[("MOVIES_APP_DATE_FORMAT", "%d/%m/%")]),
            Err(ConfigError::InvalidDateFormat { .. })
        ));
        assert_eq!(
            config(&[("MOVIES_APP_LOCAL_DATE_FORMAT", "%d/%m/%Y %H:%M")]),
            Err(ConfigError::InvalidDateFormat {
                var: "MOVIES_APP_LOCAL_DATE_FORMAT",
                value: "%d/%m/%Y %H:%M".to_owned()
            })
        );
        assert!(config(&[("MOVIES_APP_DATE_FORMAT", "%d/%m/%Y %H:%M")]).is_ok());
    }
}

//! Configuration loading from environment.

use std::env;
use std::str::FromStr;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("LOG_FORMAT must be `pretty` or `json`, got `{}`", other),
        }
    }
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub api_keys: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("PORT is not a valid port: {}", e))?;

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let api_keys: Vec<String> = lookup("GATEWAY_API_KEYS")
            .ok_or_else(|| anyhow::anyhow!("GATEWAY_API_KEYS environment variable is required"))?
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if api_keys.is_empty() {
            anyhow::bail!("GATEWAY_API_KEYS must list at least one key");
        }

        let rate_limit_per_minute = lookup("RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|| "100".to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("RATE_LIMIT_PER_MINUTE is not a number: {}", e))?;

        let log_format = lookup("LOG_FORMAT")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or(LogFormat::Pretty);

        Ok(Self {
            port,
            database_url,
            api_keys,
            rate_limit_per_minute,
            log_format,
        })
    }
}

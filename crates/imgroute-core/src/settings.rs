//! Process settings
//!
//! Settings come from the environment (optionally seeded from a `.env` file)
//! and are separate from the routing configuration file they point at.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, ENV_CACHE_CAPACITY, ENV_CONFIG_PATH, ENV_LOG_FORMAT,
    ENV_MAX_CONCURRENT_REQUESTS, ENV_SERVER_HOST, ENV_SERVER_PORT,
};

/// Console log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Routing configuration file (`.json`, `.yml` or `.yaml`)
    pub config_path: PathBuf,
    pub server_host: String,
    pub server_port: u16,
    /// Entries kept by the storage read cache; 0 disables it
    pub cache_capacity: usize,
    pub max_concurrent_requests: usize,
    pub environment: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let config_path = env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .map_err(|_| anyhow!("Please set {}", ENV_CONFIG_PATH))?;

        let server_host =
            env::var(ENV_SERVER_HOST).unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        let server_port = parse_var(ENV_SERVER_PORT, DEFAULT_SERVER_PORT)?;
        let cache_capacity = parse_var(ENV_CACHE_CAPACITY, DEFAULT_CACHE_CAPACITY)?;
        let max_concurrent_requests =
            parse_var(ENV_MAX_CONCURRENT_REQUESTS, DEFAULT_MAX_CONCURRENT_REQUESTS)?;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let log_format = match env::var(ENV_LOG_FORMAT) {
            Ok(value) => parse_log_format(&value)?,
            Err(_) => LogFormat::default(),
        };

        let settings = Settings {
            config_path,
            server_host,
            server_port,
            cache_capacity,
            max_concurrent_requests,
            environment,
            log_format,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_concurrent_requests == 0 {
            return Err(anyhow!("{} must be greater than 0", ENV_MAX_CONCURRENT_REQUESTS));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, anyhow::Error> {
    match value.trim().to_lowercase().as_str() {
        "compact" | "" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => Err(anyhow!("{} must be 'compact' or 'json', got {:?}", ENV_LOG_FORMAT, other)),
    }
}

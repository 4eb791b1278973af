use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_HH_BASE_URL: &str = "https://api.hh.ru";
const DEFAULT_SUPERJOB_BASE_URL: &str = "https://api.superjob.ru/2.0";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "vacancy-aggregator/0.1";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub hh_base_url: String,
    pub superjob_base_url: String,
    pub superjob_api_key: Option<String>,
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            hh_base_url: get_env_or("HH_BASE_URL", DEFAULT_HH_BASE_URL),
            superjob_base_url: get_env_or("SUPERJOB_BASE_URL", DEFAULT_SUPERJOB_BASE_URL),
            superjob_api_key: env::var("SJ_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
            user_agent: get_env_or("HTTP_USER_AGENT", DEFAULT_USER_AGENT),
        })
    }

    /// Configuration pointing both providers at the given base URLs, used by tests
    /// and embedders that do not read the environment.
    pub fn with_endpoints(
        hh_base_url: impl Into<String>,
        superjob_base_url: impl Into<String>,
        superjob_api_key: Option<String>,
    ) -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            hh_base_url: hh_base_url.into(),
            superjob_base_url: superjob_base_url.into(),
            superjob_api_key,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};
use crate::topics::Topic;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ARXIV_ENDPOINT: &str = "http://export.arxiv.org/api/query";
pub const DEFAULT_JMLR_FEED_URL: &str = "http://www.jmlr.org/jmlr.xml";
pub const DEFAULT_CACHE_PATH: &str = "summaries_cache.json";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub arxiv_endpoint: String,
    pub jmlr_feed_url: String,
    pub cache_path: PathBuf,
    /// Wipe the summary cache at the start of every page request.
    pub reset_cache_on_request: bool,
    /// Base unit of the summarizer's exponential backoff.
    pub retry_unit: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Topic::validate_table()?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, `load` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("GEMINI_API_KEY is not set".to_string()))?;

        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = or_default("HOST", "0.0.0.0");
        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?,
            None => DEFAULT_PORT,
        };
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let reset_cache_on_request = match lookup("RESET_CACHE_ON_REQUEST") {
            Some(flag) => parse_flag(&flag)?,
            None => true,
        };

        let retry_unit = match lookup("RETRY_UNIT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>().map_err(|e| AppError::ConfigError(format!("Invalid RETRY_UNIT_MS: {}", e)))?,
            ),
            None => Duration::from_secs(1),
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            gemini_api_key,
            gemini_model: or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            arxiv_endpoint: or_default("ARXIV_ENDPOINT", DEFAULT_ARXIV_ENDPOINT),
            jmlr_feed_url: or_default("JMLR_FEED_URL", DEFAULT_JMLR_FEED_URL),
            cache_path: PathBuf::from(or_default("CACHE_PATH", DEFAULT_CACHE_PATH)),
            reset_cache_on_request,
            retry_unit,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::ConfigError(format!("Invalid boolean flag: {}", other))),
    }
}

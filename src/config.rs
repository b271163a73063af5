use crate::error::{config_error, env_error, Error, ServiceResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Default Ticketmaster API host
pub const DEFAULT_TICKETMASTER_BASE_URL: &str = "https://app.ticketmaster.com";

/// Default Gemini model used by the agent
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Default location of the optional TOML overrides
pub const DEFAULT_CONFIG_FILE: &str = "config/service.toml";

/// How `/api/v1/chat` answers a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Free-text query handed to an LLM agent that owns the `fetch_events` tool
    #[default]
    Agent,
    /// `city`/`keyword` parameters answered straight from the events API
    Direct,
}

impl FromStr for ServiceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "agent" => Ok(ServiceMode::Agent),
            "direct" => Ok(ServiceMode::Direct),
            other => Err(config_error(&format!(
                "Unknown SERVICE_MODE '{}', expected 'agent' or 'direct'",
                other
            ))),
        }
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceMode::Agent => write!(f, "agent"),
            ServiceMode::Direct => write!(f, "direct"),
        }
    }
}

/// Fixed parameters of every outbound events search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Number of events requested per search
    pub page_size: u32,
    /// Page requested from the events API
    pub page: u32,
    /// Sort order passed through to the events API
    pub sort: String,
    /// Only return events starting after the request time
    pub start_date_filter: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page_size: 5,
            page: 1,
            sort: "date,asc".to_string(),
            start_date_filter: true,
        }
    }
}

/// Partial `[query]` table read from the TOML file
#[derive(Debug, Default, Deserialize)]
struct QueryOverrides {
    page_size: Option<u32>,
    page: Option<u32>,
    sort: Option<String>,
    start_date_filter: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    query: QueryOverrides,
}

impl QueryOptions {
    fn merge(mut self, overrides: QueryOverrides) -> Self {
        if let Some(page_size) = overrides.page_size {
            self.page_size = page_size;
        }
        if let Some(page) = overrides.page {
            self.page = page;
        }
        if let Some(sort) = overrides.sort {
            self.sort = sort;
        }
        if let Some(start_date_filter) = overrides.start_date_filter {
            self.start_date_filter = start_date_filter;
        }
        self
    }
}

/// Service configuration, built once at startup and passed to every component
#[derive(Debug, Clone)]
pub struct Config {
    /// Ticketmaster Discovery API key
    pub ticketmaster_api_key: String,
    /// Ticketmaster API host, overridable for testing
    pub ticketmaster_base_url: String,
    /// Which flavour of the chat endpoint to serve
    pub mode: ServiceMode,
    /// Gemini API key, required in agent mode
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Timeout applied to every outbound events request
    pub request_timeout: Duration,
    /// Outbound search parameters
    pub query: QueryOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ticketmaster_api_key: String::new(),
            ticketmaster_base_url: DEFAULT_TICKETMASTER_BASE_URL.to_string(),
            mode: ServiceMode::default(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
            request_timeout: Duration::from_secs(10),
            query: QueryOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration from `.env`, the process environment and the optional TOML file
    pub fn load() -> ServiceResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let config_file =
            env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let query = load_query_options(Path::new(&config_file))?;

        Self::from_vars(|key| env::var(key).ok(), query)
    }

    /// Build configuration from a variable lookup on top of the given query options
    pub fn from_vars<F>(lookup: F, query: QueryOptions) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        // The key is not validated here; a missing key shows up as auth failures upstream
        let ticketmaster_api_key = lookup("TICKETMASTER_API_KEY").unwrap_or_default();
        if ticketmaster_api_key.is_empty() {
            warn!("TICKETMASTER_API_KEY is not set, events requests will be rejected upstream");
        }

        let ticketmaster_base_url =
            lookup("TICKETMASTER_BASE_URL").unwrap_or(defaults.ticketmaster_base_url);

        let mode = match lookup("SERVICE_MODE") {
            Some(value) => value.parse::<ServiceMode>()?,
            None => defaults.mode,
        };

        let gemini_api_key = lookup("GEMINI_API_KEY").filter(|key| !key.is_empty());
        if mode == ServiceMode::Agent && gemini_api_key.is_none() {
            return Err(env_error("GEMINI_API_KEY"));
        }

        let gemini_model = lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model);
        let host = lookup("HOST").unwrap_or(defaults.host);

        // Parse numeric values
        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| env_error("Invalid PORT format"))?,
            None => defaults.port,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(
                value
                    .parse::<u64>()
                    .map_err(|_| env_error("Invalid REQUEST_TIMEOUT_SECS format"))?,
            ),
            None => defaults.request_timeout,
        };

        let mut query = query;
        if let Some(value) = lookup("EVENT_PAGE_SIZE") {
            query.page_size = value
                .parse::<u32>()
                .map_err(|_| env_error("Invalid EVENT_PAGE_SIZE format"))?;
        }
        if let Some(value) = lookup("START_DATE_FILTER") {
            query.start_date_filter = parse_flag(&value)
                .ok_or_else(|| env_error("Invalid START_DATE_FILTER format"))?;
        }
        if query.page_size == 0 {
            return Err(config_error("Page size must be at least 1"));
        }

        Ok(Config {
            ticketmaster_api_key,
            ticketmaster_base_url,
            mode,
            gemini_api_key,
            gemini_model,
            host,
            port,
            request_timeout,
            query,
        })
    }
}

/// Read the `[query]` table from the TOML file, falling back to defaults when absent
pub fn load_query_options(path: &Path) -> ServiceResult<QueryOptions> {
    let defaults = QueryOptions::default();

    let Ok(content) = fs::read_to_string(path) else {
        return Ok(defaults);
    };

    let file = toml::from_str::<FileConfig>(&content)?;
    Ok(defaults.merge(file.query))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

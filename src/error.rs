use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the service
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(city_events::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(city_events::config))]
    Config(String),

    #[error("Invalid query: {0}")]
    #[diagnostic(code(city_events::invalid_query))]
    InvalidQuery(String),

    /// The events API could not be reached (connect failure, timeout, broken body)
    #[error("{0}")]
    #[diagnostic(code(city_events::upstream_transport))]
    UpstreamTransport(String),

    /// The events API answered with a non-success status
    #[error("upstream returned HTTP {status}: {message}")]
    #[diagnostic(code(city_events::upstream_status))]
    UpstreamStatus { status: u16, message: String },

    /// The events API answered with a body we could not interpret
    #[error("Malformed events response: {0}")]
    #[diagnostic(code(city_events::upstream_data))]
    UpstreamData(String),

    #[error("Agent error: {0}")]
    #[diagnostic(code(city_events::agent))]
    Agent(String),

    #[error(transparent)]
    #[diagnostic(code(city_events::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(city_events::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(city_events::other))]
    Other(String),
}

impl Error {
    /// Whether the failure happened while talking to the events API
    pub fn is_upstream_unavailable(&self) -> bool {
        matches!(self, Error::UpstreamTransport(_) | Error::UpstreamStatus { .. })
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type ServiceResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create query validation errors
pub fn invalid_query_error(message: &str) -> Error {
    Error::InvalidQuery(message.to_string())
}

/// Helper to create upstream transport errors
pub fn upstream_transport_error(message: &str) -> Error {
    Error::UpstreamTransport(message.to_string())
}

/// Helper to create upstream data errors
pub fn upstream_data_error(message: &str) -> Error {
    Error::UpstreamData(message.to_string())
}

/// Helper to create agent errors
pub fn agent_error(message: &str) -> Error {
    Error::Agent(message.to_string())
}

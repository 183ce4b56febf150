// ================================================================
// File: commandcenter-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    /// A required external value (env var) was absent or empty.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Non-success HTTP status from the token endpoint or Helix.
    #[error("Twitch API error: HTTP {status} => {body}")]
    Upstream { status: u16, body: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    /// Catalog input problems (unknown Type, missing Category in strict mode, ...).
    #[error("Catalog input error: {0}")]
    Schema(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn missing_env(name: &str) -> Self {
        Error::Config(format!("Missing env: {}", name))
    }

    /// Upstream status code, if this error came from a non-success response.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Error::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

use thiserror::Error;

/// Failures talking to a model provider
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing, malformed or rejected API key (HTTP 401/403)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// HTTP 429; `retry_after` is in seconds when the provider says
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Request rejected before generation (HTTP 400 or bad local input)
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The call succeeded but produced no usable text, e.g. a safety block
    #[error("No text candidate returned (finish reason: {})", .finish_reason.as_deref().unwrap_or("unknown"))]
    NoCandidate { finish_reason: Option<String> },

    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LlmError {
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    pub fn rate_limit<S: Into<String>>(message: S, retry_after: Option<u64>) -> Self {
        Self::RateLimit {
            message: message.into(),
            retry_after,
        }
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn api_error(status: u16, message: String) -> Self {
        Self::Api { status, message }
    }

    pub fn no_candidate(finish_reason: Option<String>) -> Self {
        Self::NoCandidate { finish_reason }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status reported by the provider, if the failure came with one
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::RateLimit { .. } => Some(429),
            LlmError::Network { source } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the same request may succeed if sent again later
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimit { .. } | LlmError::Network { .. } => true,
            LlmError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

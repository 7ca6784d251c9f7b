use genboq_llm_sdk::error::LlmError;
use thiserror::Error;

/// Errors raised while generating, editing or exporting a BOQ
#[derive(Error, Debug)]
pub enum BoqError {
    /// Required credential or configuration is missing; fatal at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The model returned text that is not JSON or does not match the BOQ schema
    #[error("Malformed response from the AI model: {0}")]
    MalformedResponse(String),

    /// The action needs rooms (or a project name) that are not there yet
    #[error("{0}")]
    EmptyState(String),

    /// The generation call itself failed
    #[error("Failed to communicate with the AI model: {source}")]
    Transport {
        #[from]
        source: LlmError,
    },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rejected field input; the previous value is kept
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },

    #[error("{0} not found")]
    NotFound(String),

    /// A generation or refinement is already outstanding for this session
    #[error("A generation or refinement request is already in progress")]
    Busy,

    /// Currency-dependent actions wait for the startup rate fetch
    #[error("Exchange rates are still loading")]
    RatesPending,

    #[error("Failed to build workbook: {source}")]
    Export {
        #[from]
        source: rust_xlsxwriter::XlsxError,
    },
}

impl BoqError {
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn empty_state<S: Into<String>>(message: S) -> Self {
        Self::EmptyState(message.into())
    }

    pub fn invalid_value<S: Into<String>>(field: &'static str, message: S) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    /// Single message shown to the user at the point of invocation
    pub fn user_message(&self) -> String {
        match self {
            BoqError::MalformedResponse(_) => {
                "The AI model returned a Bill of Quantities in an unexpected format. Please try again or rephrase your requirements.".to_string()
            }
            BoqError::Transport { .. } => {
                "Failed to generate the Bill of Quantities from the AI model. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }
}

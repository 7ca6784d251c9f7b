use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use genboq_core::BoqError;
use shared_types::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Boq(#[from] BoqError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Session {0} not found")]
    SessionNotFound(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    fn user_message(&self) -> String {
        match self {
            ApiError::Boq(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Boq(e) => match e {
                BoqError::InvalidRequest(_)
                | BoqError::InvalidValue { .. }
                | BoqError::EmptyState(_) => StatusCode::BAD_REQUEST,
                BoqError::NotFound(_) => StatusCode::NOT_FOUND,
                BoqError::Busy | BoqError::RatesPending => StatusCode::CONFLICT,
                BoqError::MalformedResponse(_) | BoqError::Transport { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                BoqError::Configuration(_) | BoqError::Export { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.user_message(),
        })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

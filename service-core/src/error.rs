use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the HTTP layer of a connector service.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Caller input rejected before anything left the process.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The upstream API is rate limiting us.
    #[error("Too many requests: {message}")]
    TooManyRequests {
        message: String,
        retry_after: Option<u64>,
    },

    /// The upstream API failed or could not be reached.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        // Internal details stay in `details`; the headline never echoes them.
        let (error, details) = match self {
            AppError::ValidationError(err) => ("Validation error".to_string(), Some(err.to_string())),
            AppError::BadRequest(msg) | AppError::BadGateway(msg) => (msg.clone(), None),
            AppError::TooManyRequests { message, .. } => (message.clone(), None),
            AppError::InternalError(err) => {
                ("Internal server error".to_string(), Some(format!("{:#}", err)))
            }
            AppError::ConfigError(err) => ("Configuration error".to_string(), Some(err.to_string())),
        };
        ErrorBody { error, details }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut response = (self.status_code(), Json(self.body())).into_response();

        if let AppError::TooManyRequests {
            retry_after: Some(seconds),
            ..
        } = self
        {
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(seconds));
        }

        response
    }
}

use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to fetch CCTV data from external API")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("Invalid JSON response from external API")]
    UpstreamInvalidJson(#[source] SerdeJsonError),

    #[error("Invalid data structure from external API")]
    UpstreamInvalidStructure,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] SerdeJsonError),
}

impl AppError {
    /// Message returned to clients. Anything that is not an upstream failure
    /// collapses to a generic message so internals never leak.
    pub fn public_message(&self) -> String {
        match self {
            AppError::UpstreamUnavailable(_)
            | AppError::UpstreamInvalidJson(_)
            | AppError::UpstreamInvalidStructure => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", self);
        }
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.public_message(),
            }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::UpstreamInvalidJson(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamInvalidStructure => StatusCode::BAD_GATEWAY,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidUrl(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

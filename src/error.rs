use crate::models::ErrorEnvelope;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification reported to callers as `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    ConfigurationError,
    ModelLoading,
    CreditsDepleted,
    #[serde(rename = "rate_limit")]
    RateLimited,
    #[serde(rename = "api_error")]
    ProviderError,
    QuotaExhausted,
    InternalError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ConfigurationError => "configuration_error",
            ErrorKind::ModelLoading => "model_loading",
            ErrorKind::CreditsDepleted => "credits_depleted",
            ErrorKind::RateLimited => "rate_limit",
            ErrorKind::ProviderError => "api_error",
            ErrorKind::QuotaExhausted => "quota_exhausted",
            ErrorKind::InternalError => "internal_error",
        }
    }

    /// Status used when the provider status is not passed through.
    pub fn default_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::ModelLoading => 503,
            ErrorKind::RateLimited => 429,
            ErrorKind::CreditsDepleted => 402,
            ErrorKind::ProviderError => 502,
            ErrorKind::ConfigurationError | ErrorKind::QuotaExhausted | ErrorKind::InternalError => {
                500
            }
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by an upstream provider client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ProviderError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => ProviderError::Transport(err.to_string()),
        }
    }
}

/// Route-facing error, rendered as the JSON error envelope.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct GeneLabError {
    pub kind: ErrorKind,
    pub message: String,
    pub details: Option<String>,
    pub status: u16,
    pub fallback: bool,
}

impl GeneLabError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            status: kind.default_status(),
            fallback: false,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigurationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message.clone(),
            error_type: self.kind,
            details: self.details.clone(),
            fallback: self.fallback.then_some(true),
        }
    }
}

#[cfg(feature = "server")]
impl actix_web::ResponseError for GeneLabError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.status)
            .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(self.envelope())
    }
}

pub type Result<T> = std::result::Result<T, GeneLabError>;

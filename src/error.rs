use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::util::{newsapi::HeadlineError, speech::SpeechError};

/// Failure of a single extract-and-summarize call. Every variant is terminal;
/// nothing in the pipeline retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("fetch failed: {message}")]
    Fetch {
        status: Option<u16>,
        message: String,
    },
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    InvalidInput,
    FetchError,
    ExtractionFailed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::FetchError => "FetchError",
            ErrorKind::ExtractionFailed => "ExtractionFailed",
        }
    }
}

impl DigestError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DigestError::InvalidInput(message.into())
    }

    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        DigestError::Fetch {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DigestError::InvalidInput(_) => ErrorKind::InvalidInput,
            DigestError::Fetch { .. } => ErrorKind::FetchError,
            DigestError::ExtractionFailed(_) => ErrorKind::ExtractionFailed,
        }
    }

    /// Upstream HTTP status, only set for fetches that got a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            DigestError::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

pub type DigestResult<T> = Result<T, DigestError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{0}")]
    NotConfigured(String),
    #[error("upstream returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },
    #[error(transparent)]
    Digest(#[from] DigestError),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message, upstream) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BadRequest".to_string(),
                msg,
                None,
            ),
            AppError::NotConfigured(msg) => {
                tracing::error!(reason = %msg, "collaborator not configured");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "NotConfigured".to_string(),
                    msg,
                    None,
                )
            }
            AppError::Upstream { status, message } => {
                tracing::warn!(status = status.as_u16(), %message, "upstream request failed");
                (status, "Upstream".to_string(), message, Some(status.as_u16()))
            }
            AppError::Digest(err) => {
                let code = err.kind().as_str().to_string();
                match err {
                    DigestError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, code, msg, None),
                    DigestError::Fetch { status, message } => {
                        tracing::warn!(?status, %message, "article fetch failed");
                        (StatusCode::BAD_GATEWAY, code, message, status)
                    }
                    DigestError::ExtractionFailed(msg) => {
                        tracing::warn!(reason = %msg, "article extraction failed");
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            code,
                            "Could not extract article text".to_string(),
                            None,
                        )
                    }
                }
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal".to_string(),
                    "internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code,
                message,
                status: upstream,
            },
        });

        (status, body).into_response()
    }
}

impl AppError {
    fn upstream(status: u16, message: String) -> Self {
        AppError::Upstream {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            message,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<HeadlineError> for AppError {
    fn from(err: HeadlineError) -> Self {
        match err {
            HeadlineError::NotConfigured => AppError::NotConfigured(err.to_string()),
            HeadlineError::Upstream { status, message } => AppError::upstream(status, message),
            HeadlineError::Other(inner) => AppError::Internal(inner),
        }
    }
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::NotConfigured => AppError::NotConfigured(err.to_string()),
            SpeechError::Upstream { status, message } => AppError::upstream(status, message),
            SpeechError::Other(inner) => AppError::Internal(inner),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

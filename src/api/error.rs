//! Request errors and their HTTP mapping.
//!
//! Each variant carries the short message shown to the client. The underlying cause
//! is logged when the response is built and never sent over the wire.

use crate::document::ExtractionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ApiError {
    /// A required request field is missing or empty.
    #[error("{0}")]
    Input(&'static str),

    /// The request body is over the upload limit.
    #[error("{0}")]
    TooLarge(&'static str),

    /// The document could not be turned into text.
    #[error("{message}: {source}")]
    Extraction {
        message: &'static str,
        #[source]
        source: ExtractionError,
    },

    /// The model call failed or returned something unusable.
    #[error("{message}: {source}")]
    Upstream {
        message: &'static str,
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    pub fn upstream(message: &'static str, source: impl Into<BoxError>) -> Self {
        ApiError::Upstream {
            message,
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Input(_) | ApiError::Extraction { .. } => StatusCode::BAD_REQUEST,
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_message(&self) -> &'static str {
        match self {
            ApiError::Input(message)
            | ApiError::TooLarge(message)
            | ApiError::Extraction { message, .. }
            | ApiError::Upstream { message, .. } => *message,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        let body = ErrorBody {
            error: self.client_message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

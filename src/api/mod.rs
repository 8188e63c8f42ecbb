pub mod error;

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    routing::{get, post},
    Json, Router,
};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::document::{DocumentSource, ExtractionError, TextExtractor};
use crate::llm::{AnalysisResult, Analyzer, QuestionAnswerer};
use crate::providers::traits::CompletionProvider;

pub use error::{ApiError, ErrorBody};

/// Largest request body accepted, uploads included.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

const DOCUMENT_FIELD: &str = "document";

#[derive(Clone)]
pub struct AppState {
    extractor: TextExtractor,
    analyzer: Analyzer,
    answerer: QuestionAnswerer,
    model: String,
}

impl AppState {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Result<Self, ExtractionError> {
        Ok(Self {
            extractor: TextExtractor::new()?,
            analyzer: Analyzer::new(provider.clone()),
            answerer: QuestionAnswerer::new(provider.clone()),
            model: provider.model_name().to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    question: Option<String>,
    context: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

/// Create and configure the API router
pub fn create_api(state: AppState) -> Router {
    // Any origin may call the API; the browser client is served from elsewhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/analyzeDocument", post(analyze_document_handler))
        .route("/analyzeUrl", post(analyze_url_handler))
        .route("/askQuestion", post(ask_question_handler))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Logs why an upload body was rejected and maps it to the client-facing error.
fn rejected_upload(status: StatusCode, cause: impl Display) -> ApiError {
    warn!("Rejected upload ({}): {}", status, cause);
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::TooLarge("Document too large.")
    } else {
        ApiError::Input("No document part")
    }
}

async fn analyze_document_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let mut multipart = multipart.map_err(|e| rejected_upload(e.status(), e.body_text()))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejected_upload(e.status(), e.body_text()))?
    {
        if field.name() != Some(DOCUMENT_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| rejected_upload(e.status(), e.body_text()))?;
        upload = Some((filename, content_type, bytes.to_vec()));
        break;
    }

    let (filename, content_type, bytes) = upload.ok_or(ApiError::Input("No document part"))?;
    if filename.is_empty() {
        return Err(ApiError::Input("No selected file"));
    }
    info!("Processing upload: {} ({} bytes)", filename, bytes.len());

    let text = state
        .extractor
        .extract(DocumentSource::Upload { filename, content_type, bytes })
        .await
        .map_err(|source| ApiError::Extraction {
            message: "Could not extract text.",
            source,
        })?;

    let result = state
        .analyzer
        .analyze(&text)
        .await
        .map_err(|e| ApiError::upstream("Analysis failed.", e))?;
    Ok(Json(result))
}

async fn analyze_url_handler(
    State(state): State<AppState>,
    payload: Result<Json<UrlRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected URL request: {}", e.body_text());
        ApiError::Input("Missing URL")
    })?;
    let url = request
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or(ApiError::Input("Missing URL"))?;
    info!("Processing URL: {}", url);

    let text = state
        .extractor
        .extract(DocumentSource::Url(url))
        .await
        .map_err(|source| ApiError::Extraction {
            message: "Could not fetch text from URL. It might be blocked or invalid.",
            source,
        })?;

    let result = state
        .analyzer
        .analyze(&text)
        .await
        .map_err(|e| ApiError::upstream("Analysis failed.", e))?;
    Ok(Json(result))
}

async fn ask_question_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let missing = ApiError::Input("Missing question or context");
    let request = match payload {
        Ok(Json(request)) => request,
        Err(e) => {
            warn!("Rejected question request: {}", e.body_text());
            return Err(missing);
        }
    };
    let (Some(question), Some(context)) = (request.question, request.context) else {
        return Err(missing);
    };

    let answer = state
        .answerer
        .ask(&question, &context)
        .await
        .map_err(|e| ApiError::upstream("Failed to get an answer.", e))?;
    Ok(Json(AnswerResponse { answer }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.model.clone(),
    })
}

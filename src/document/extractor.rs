use crate::document::html::html_to_text;
use crate::document::pdf::{looks_like_pdf, pdf_to_text_blocking};
use reqwest::{header, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Some sites refuse requests that do not look like they come from a browser.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Where a document's bytes come from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// An uploaded file, or pasted text sent as a blob.
    Upload {
        filename: String,
        content_type: Option<String>,
        bytes: Vec<u8>,
    },
    Url(String),
}

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to fetch document: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("document contains no extractable text")]
    NoContent,
}

/// Turns uploads and URLs into plain text.
#[derive(Clone)]
pub struct TextExtractor {
    client: Client,
}

impl TextExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Extracts the text of `source`. Never returns an empty or whitespace-only string.
    pub async fn extract(&self, source: DocumentSource) -> Result<String, ExtractionError> {
        let text = match source {
            DocumentSource::Upload { filename, content_type, bytes } => {
                extract_upload(&filename, content_type.as_deref(), bytes).await?
            }
            DocumentSource::Url(url) => self.extract_url(&url).await?,
        };

        if text.trim().is_empty() {
            return Err(ExtractionError::NoContent);
        }
        Ok(text)
    }

    async fn extract_url(&self, raw_url: &str) -> Result<String, ExtractionError> {
        let url = parse_http_url(raw_url)?;
        info!("Fetching document from {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ExtractionError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        let bytes = response.bytes().await?;

        if is_pdf_response(&content_type, &url) {
            debug!("Treating {} as PDF ({} bytes)", url, bytes.len());
            pdf_to_text_blocking(bytes.to_vec()).await
        } else {
            debug!("Treating {} as HTML ({} bytes)", url, bytes.len());
            Ok(html_to_text(&decode_utf8_discarding(&bytes)))
        }
    }
}

async fn extract_upload(
    filename: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<String, ExtractionError> {
    if is_pdf_upload(filename, content_type, &bytes) {
        debug!("Reading uploaded PDF {} ({} bytes)", filename, bytes.len());
        pdf_to_text_blocking(bytes).await
    } else {
        Ok(decode_utf8_discarding(&bytes))
    }
}

/// Decodes UTF-8, dropping invalid byte sequences instead of failing.
fn decode_utf8_discarding(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn parse_http_url(raw_url: &str) -> Result<Url, ExtractionError> {
    let invalid = |reason: String| ExtractionError::InvalidUrl {
        url: raw_url.to_string(),
        reason,
    };

    let url = Url::parse(raw_url.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn is_pdf_upload(filename: &str, content_type: Option<&str>, bytes: &[u8]) -> bool {
    filename.to_lowercase().ends_with(".pdf")
        || content_type.map_or(false, |ct| ct.to_lowercase().contains("application/pdf"))
        || looks_like_pdf(bytes)
}

fn is_pdf_response(content_type: &str, url: &Url) -> bool {
    content_type.contains("application/pdf") || url.path().to_lowercase().ends_with(".pdf")
}

use crate::document::extractor::ExtractionError;

const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Decodes every page and concatenates the page texts in page order.
pub fn pdf_to_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(pages.concat())
}

/// Runs [`pdf_to_text`] on the blocking pool. A panic inside the decoder comes back as
/// an extraction error instead of taking down the worker.
pub async fn pdf_to_text_blocking(bytes: Vec<u8>) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_to_text(&bytes))
        .await
        .map_err(|e| ExtractionError::Pdf(format!("PDF decoder aborted: {}", e)))?
}

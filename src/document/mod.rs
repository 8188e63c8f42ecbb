pub mod extractor;
pub mod html;
pub mod pdf;

#[cfg(test)]
pub(crate) mod fixtures;

pub use extractor::{DocumentSource, ExtractionError, TextExtractor};

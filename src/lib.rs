pub mod api;
pub mod config;
pub mod document;
pub mod llm;
pub mod providers;

// Re-export commonly used items
pub use api::{create_api, AppState};
pub use config::AppConfig;
pub use document::{DocumentSource, TextExtractor};
pub use llm::{AnalysisResult, Analyzer, QuestionAnswerer};

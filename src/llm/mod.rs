pub mod analysis;
pub mod parser;
pub mod qa;

pub use analysis::{AnalysisError, AnalysisResult, Analyzer, KeyClause, RiskFlag, RiskLevel};
pub use qa::{QaError, QuestionAnswerer, FALLBACK_ANSWER};

use crate::llm::parser::parse_object_as;
use crate::providers::traits::CompletionProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Instruction sent ahead of every document. Defines the JSON the model must return.
pub const ANALYSIS_INSTRUCTIONS: &str = r#"You are a legal document analysis bot. Analyze the provided document and return a single, valid JSON object.

JSON Structure:
{
  "summary": "<Comprehensive summary of the document>",
  "riskFlags": [
    { "level": "<'Red' or 'Yellow'>", "title": "<Risk Title>", "explanation": "<Risk Explanation>" }
  ],
  "keyClauses": [
    { "title": "<Clause Title>", "originalText": "<Original Clause Text>", "simplifiedText": "<Simplified Explanation>" }
  ]
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Severe risk.
    #[serde(alias = "red", alias = "RED")]
    Red,
    /// Proceed with caution.
    #[serde(alias = "yellow", alias = "YELLOW")]
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFlag {
    pub level: RiskLevel,
    pub title: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyClause {
    pub title: String,
    pub original_text: String,
    pub simplified_text: String,
}

/// What the model produces. The source text is attached afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelAnalysis {
    summary: String,
    #[serde(default)]
    risk_flags: Vec<RiskFlag>,
    #[serde(default)]
    key_clauses: Vec<KeyClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub risk_flags: Vec<RiskFlag>,
    pub key_clauses: Vec<KeyClause>,
    /// The analyzed text, returned so the client can ask follow-up questions about it.
    pub full_document_text: String,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("document is empty")]
    EmptyDocument,

    #[error("LLM request failed: {0}")]
    Provider(#[source] anyhow::Error),

    #[error("LLM response did not contain a valid analysis")]
    UnparseableResponse,
}

/// Runs one document through the model and shapes the reply into an [`AnalysisResult`].
#[derive(Clone)]
pub struct Analyzer {
    provider: Arc<dyn CompletionProvider>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    pub async fn analyze(&self, document_text: &str) -> Result<AnalysisResult, AnalysisError> {
        if document_text.trim().is_empty() {
            return Err(AnalysisError::EmptyDocument);
        }

        info!("Requesting analysis of {} characters", document_text.len());
        let parts = [
            ANALYSIS_INSTRUCTIONS.to_string(),
            format!("Analyze this document:\n\n{}", document_text),
        ];

        let response = self.provider.complete_parts(&parts).await.map_err(|e| {
            error!("Error during analysis LLM call: {:#}", e);
            AnalysisError::Provider(e)
        })?;

        let analysis: ModelAnalysis = parse_object_as(&response).ok_or_else(|| {
            error!("Could not parse analysis from LLM response ({} chars)", response.len());
            AnalysisError::UnparseableResponse
        })?;

        Ok(AnalysisResult {
            summary: analysis.summary,
            risk_flags: analysis.risk_flags,
            key_clauses: analysis.key_clauses,
            full_document_text: document_text.to_string(),
        })
    }
}

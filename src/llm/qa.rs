use crate::providers::traits::CompletionProvider;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

/// The exact reply the model is told to give when the context lacks the answer.
pub const FALLBACK_ANSWER: &str = "I'm sorry, I cannot find the answer to that in this document.";

#[derive(Error, Debug)]
pub enum QaError {
    #[error("LLM request failed: {0}")]
    Provider(#[source] anyhow::Error),
}

/// Answers questions about a document the client already holds.
#[derive(Clone)]
pub struct QuestionAnswerer {
    provider: Arc<dyn CompletionProvider>,
}

impl QuestionAnswerer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Returns the model's answer verbatim.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String, QaError> {
        let prompt = build_prompt(question, context);
        self.provider.complete(&prompt).await.map_err(|e| {
            error!("Error during Q&A LLM call: {:#}", e);
            QaError::Provider(e)
        })
    }
}

pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "Based ONLY on the document text provided below, answer the user's question in a simple and direct way.\n\
         If the answer is not in the document, say \"{}\"\n\
         ---\n\
         DOCUMENT TEXT: {}\n\
         ---\n\
         USER'S QUESTION: \"{}\"",
        FALLBACK_ANSWER, context, question
    )
}

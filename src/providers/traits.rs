use async_trait::async_trait;
use anyhow::Result;

/// A text-generation backend. Components hold it as `Arc<dyn CompletionProvider>`
/// so a stub can stand in for the real service in tests.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends a single text prompt and returns the model's raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.complete_parts(&[prompt.to_string()]).await
    }

    /// Sends a prompt made of several text segments in one request.
    async fn complete_parts(&self, parts: &[String]) -> Result<String>;

    fn model_name(&self) -> &str;
}

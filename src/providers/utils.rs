use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::providers::traits::CompletionProvider;
use std::sync::Mutex;

/// Test double for [`CompletionProvider`]. Replies with a canned response (or fails)
/// and records every prompt it receives.
pub struct StubProvider {
    reply: Result<String, String>,
    prompts: Mutex<Vec<Vec<String>>>,
}

impl StubProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt sent so far, one entry per request, each a list of segments.
    pub fn prompts(&self) -> Vec<Vec<String>> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete_parts(&self, parts: &[String]) -> Result<String> {
        self.prompts.lock().unwrap().push(parts.to_vec());
        self.reply.clone().map_err(|e| anyhow!(e))
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_records_prompts() {
        let stub = StubProvider::replying("ok");
        assert_eq!(stub.complete("hello").await.unwrap(), "ok");
        assert_eq!(stub.prompts(), vec![vec!["hello".to_string()]]);
    }

    #[tokio::test]
    async fn test_stub_failure() {
        let stub = StubProvider::failing("quota exceeded");
        let err = stub.complete("hello").await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
        assert_eq!(stub.call_count(), 1);
    }
}

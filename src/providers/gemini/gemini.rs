use async_trait::async_trait;
use anyhow::{Result, anyhow};
use crate::config::AppConfig;
use crate::providers::traits::CompletionProvider;
use reqwest::Client;
use serde_json::{json, Value};

#[derive(Clone)]
pub struct GeminiProvider {
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    client: Client,
}

impl GeminiProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_url, self.model)
    }
}

/// Builds the `generateContent` request body: one user turn with one text part per segment.
fn request_body(parts: &[String], temperature: f32) -> Value {
    let parts: Vec<Value> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "contents": [{
            "role": "user",
            "parts": parts
        }],
        "generationConfig": {
            "temperature": temperature
        }
    })
}

/// Pulls the generated text out of a `generateContent` response, joining all text parts
/// of the first candidate.
fn response_text(response_json: &Value) -> Result<String> {
    if let Some(error) = response_json.get("error") {
        return Err(anyhow!("API returned error: {}", error));
    }

    let parts = response_json
        .get("candidates")
        .and_then(|candidates| candidates.get(0))
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or_else(|| anyhow!("Invalid response format: no candidate content"))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        return Err(anyhow!("Invalid response format: candidate has no text"));
    }
    Ok(text)
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete_parts(&self, parts: &[String]) -> Result<String> {
        let response = self.client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(parts, self.temperature))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(anyhow!("API request failed: Status {}, Body: {}", status, error_text));
        }

        let response_json: Value = response.json().await?;
        response_text(&response_json)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_has_one_part_per_segment() {
        let body = request_body(&["system".to_string(), "document".to_string()], 0.2);
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["text"], "system");
        assert_eq!(parts[1]["text"], "document");
        assert_eq!(body["contents"][0]["role"], "user");
    }

    #[test]
    fn response_text_joins_candidate_parts() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] }
            }]
        });
        assert_eq!(response_text(&response).unwrap(), "Hello, world");
    }

    #[test]
    fn response_text_surfaces_api_errors() {
        let response = json!({ "error": { "code": 403, "message": "API key not valid" } });
        let err = response_text(&response).unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[test]
    fn response_text_rejects_empty_candidates() {
        assert!(response_text(&json!({ "candidates": [] })).is_err());
        let blocked = json!({ "candidates": [{ "content": { "parts": [] } }] });
        assert!(response_text(&blocked).is_err());
    }

    #[test]
    fn endpoint_uses_configured_model() {
        let config = AppConfig {
            api_key: "key".to_string(),
            model: "gemini-flash-latest".to_string(),
            api_url: "https://example.test/v1beta/models/".to_string(),
            temperature: 0.7,
        };
        let provider = GeminiProvider::new(&config);
        assert_eq!(
            provider.endpoint(),
            "https://example.test/v1beta/models/gemini-flash-latest:generateContent"
        );
        assert_eq!(provider.model_name(), "gemini-flash-latest");
    }
}

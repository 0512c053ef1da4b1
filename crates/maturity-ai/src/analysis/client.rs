use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::prompt::{AnalysisPrompt, ANALYSIS_TOOL_NAME};
use super::AnalysisError;
use crate::config::OpenAiConfig;

const MAX_OUTPUT_TOKENS: u32 = 2000;
// Intentionally non-zero: the report should read as varied, natural prose.
// Determinism is not a requirement of the pipeline.
const SAMPLING_TEMPERATURE: f64 = 0.7;

/// What the provider handed back before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelOutput {
    /// Arguments JSON from the forced tool call.
    ToolCall(String),
    /// Plain message content, seen when the provider ignores the tool
    /// constraint.
    Text(String),
}

/// Seam for the completion provider so the pipeline and router can be
/// exercised with stubs.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn request_analysis(&self, prompt: &AnalysisPrompt)
        -> Result<ModelOutput, AnalysisError>;
}

/// Chat-completions client. Sends exactly one request per call; retry is a
/// caller decision surfaced through [`AnalysisError::retryable`].
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AnalysisError::Network(err.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn request_analysis(
        &self,
        prompt: &AnalysisPrompt,
    ) -> Result<ModelOutput, AnalysisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnalysisError::ServiceUnavailable)?;

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user }
            ],
            "tools": [prompt.tool],
            "tool_choice": {
                "type": "function",
                "function": { "name": ANALYSIS_TOOL_NAME }
            },
            "max_tokens": MAX_OUTPUT_TOKENS,
            "temperature": SAMPLING_TEMPERATURE,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AnalysisError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "completion provider rejected the request");
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|_| AnalysisError::UnexpectedFormat)?;

        output_from_completion(completion)
    }
}

fn output_from_completion(completion: ChatCompletion) -> Result<ModelOutput, AnalysisError> {
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(AnalysisError::UnexpectedFormat)?;

    if let Some(call) = message.tool_calls.into_iter().flatten().next() {
        return Ok(ModelOutput::ToolCall(call.function.arguments));
    }

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(ModelOutput::Text(content)),
        _ => Err(AnalysisError::UnexpectedFormat),
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn completion(body: serde_json::Value) -> ChatCompletion {
        serde_json::from_value(body).expect("completion envelope parses")
    }

    #[tokio::test]
    async fn missing_credential_reports_service_unavailable() {
        let client = OpenAiClient::from_config(&OpenAiConfig {
            api_key: None,
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(5),
        })
        .expect("client builds");

        let prompt = AnalysisPrompt {
            system: String::new(),
            user: String::new(),
            tool: json!({}),
        };
        let error = client
            .request_analysis(&prompt)
            .await
            .expect_err("no credential configured");
        assert!(matches!(error, AnalysisError::ServiceUnavailable));
        assert!(!error.retryable());
    }

    #[test]
    fn tool_call_arguments_win_over_content() {
        let output = output_from_completion(completion(json!({
            "choices": [{
                "message": {
                    "content": "ignored",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": ANALYSIS_TOOL_NAME, "arguments": "{\"summary\":\"ok\"}" }
                    }]
                }
            }]
        })))
        .expect("tool call extracted");
        assert_eq!(
            output,
            ModelOutput::ToolCall("{\"summary\":\"ok\"}".to_string())
        );
    }

    #[test]
    fn plain_content_falls_back_to_text_output() {
        let output = output_from_completion(completion(json!({
            "choices": [{ "message": { "content": "1. Summary\nProse here." } }]
        })))
        .expect("content extracted");
        assert_eq!(output, ModelOutput::Text("1. Summary\nProse here.".to_string()));
    }

    #[test]
    fn empty_message_is_an_unexpected_format() {
        let error = output_from_completion(completion(json!({
            "choices": [{ "message": { "content": "   " } }]
        })))
        .expect_err("nothing usable in the message");
        assert!(matches!(error, AnalysisError::UnexpectedFormat));

        let error = output_from_completion(completion(json!({ "choices": [] })))
            .expect_err("no choices at all");
        assert!(matches!(error, AnalysisError::UnexpectedFormat));
    }
}

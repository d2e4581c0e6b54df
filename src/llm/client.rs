// file: src/llm/client.rs
// description: OpenAI-compatible chat completions client for report generation
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::config::{Credentials, LlmConfig};
use crate::error::{AnalysisError, Result};
use crate::llm::ReportGenerator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    credentials: Credentials,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(credentials: Credentials, config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AnalysisError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            credentials,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        }
    }
}

impl ReportGenerator for OpenAiClient {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = self.request_body(system_prompt, user_prompt);

        debug!(
            "Requesting completion from {} ({} + {} prompt chars)",
            self.model,
            system_prompt.len(),
            user_prompt.len()
        );

        let mut builder = self
            .client
            .post(self.endpoint())
            .header(
                "Authorization",
                format!("Bearer {}", self.credentials.api_key),
            )
            .header("Content-Type", "application/json");

        if let Some(project_id) = &self.credentials.project_id {
            builder = builder.header("OpenAI-Project", project_id);
        }

        let response = builder.json(&request).send().await.map_err(|e| {
            AnalysisError::ExternalCallFailed(format!("Failed to send chat request: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalysisError::ExternalCallFailed(format!(
                "Chat request failed with status {}: {}",
                status, error_text
            )));
        }

        let body = response.text().await.map_err(|e| {
            AnalysisError::ExternalCallFailed(format!("Failed to read chat response: {}", e))
        })?;

        extract_content(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn extract_content(body: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(body).map_err(|e| {
        AnalysisError::ExternalCallFailed(format!("Failed to parse chat response: {}", e))
    })?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            AnalysisError::ExternalCallFailed("No content returned by the model".to_string())
        })?;

    debug!("Received {} chars of report text", content.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client() -> OpenAiClient {
        let mut llm = Config::default_config().llm;
        llm.base_url = "https://api.example.com/v1/".to_string();
        OpenAiClient::new(
            Credentials {
                api_key: "sk-test".to_string(),
                project_id: None,
            },
            &llm,
        )
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            client().endpoint(),
            "https://api.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let client = client();
        let body = serde_json::to_value(client.request_body("sys", "usr")).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "sys");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"===SECTION 1===\nHi"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "===SECTION 1===\nHi");
    }

    #[test]
    fn test_extract_content_failures() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"  "}}]}"#,
            "not json",
        ] {
            assert!(matches!(
                extract_content(body),
                Err(AnalysisError::ExternalCallFailed(_))
            ));
        }
    }

    #[test]
    fn test_unreachable_endpoint_is_external_failure() {
        let mut llm = Config::default_config().llm;
        llm.base_url = "http://127.0.0.1:9".to_string();
        llm.timeout_secs = 2;
        let client = OpenAiClient::new(
            Credentials {
                api_key: "sk-test".to_string(),
                project_id: Some("proj".to_string()),
            },
            &llm,
        )
        .unwrap();

        let result = tokio_test::block_on(client.generate("sys", "usr"));
        assert!(matches!(result, Err(AnalysisError::ExternalCallFailed(_))));
    }
}

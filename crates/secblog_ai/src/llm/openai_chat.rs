use std::time::Duration;

use secblog_core::error::AppError;
use serde::{Deserialize, Serialize};

use super::Llm;
use crate::openai::OpenAiClient;

const CHAT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone)]
pub struct OpenAiChat {
    client: OpenAiClient,
}

impl OpenAiChat {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl Llm for OpenAiChat {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        let url = self.client.endpoint("chat/completions");
        let req = ChatRequest {
            model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        };
        tracing::debug!(model, prompt_chars = prompt.len(), "chat completion request");
        let resp = ureq::post(&url)
            .set("Authorization", &self.client.authorization())
            .timeout(CHAT_TIMEOUT)
            .send_json(req)
            .map_err(|e| OpenAiClient::request_error("EXTERNAL_LLM_FAILED", "Chat completion", e))?;

        let parsed: ChatResponse = resp.into_json().map_err(|e| {
            AppError::new("EXTERNAL_LLM_FAILED", "Failed to decode chat completion response")
                .with_details(e.to_string())
        })?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if answer.trim().is_empty() {
            return Err(AppError::new(
                "EXTERNAL_LLM_FAILED",
                "Chat completion response was empty",
            ));
        }
        Ok(answer)
    }
}

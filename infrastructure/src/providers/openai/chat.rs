//! Chat completions adapter implementing the generation port

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tandem_application::ports::generation::{
    GenerationError, GenerationGateway, GenerationRequest,
};
use tandem_domain::Message;
use tracing::debug;

/// Generation gateway backed by an OpenAI-compatible `/chat/completions`
/// endpoint
pub struct OpenAiChatGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiChatGateway {
    /// Create a gateway for the given endpoint
    ///
    /// `base_url` is the API root (e.g. `http://localhost:11434/v1`);
    /// local backends like Ollama accept any non-empty `api_key`.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl GenerationGateway for OpenAiChatGateway {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %request.model, messages = request.messages.len(), "chat completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else {
                    GenerationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GenerationError::Quota(format!(
                "rate limited by {}",
                self.base_url
            )));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerationError::Network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                detail
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                GenerationError::MalformedResponse("response contained no choices".to_string())
            })
    }
}

use serde::{Deserialize, Serialize};

use super::types::{LlmClient, VisionClient};
use super::ExtractionError;

/// Ollama HTTP client for local model inference.
///
/// Covers both calls the pipeline needs: plain text generation via
/// `/api/generate`, and vision chat via `/api/chat` (the endpoint
/// chat-template vision models expect for image inputs).
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at a local Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ExtractionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Default local instance with the configured model timeout.
    pub fn default_local() -> Result<Self, ExtractionError> {
        Self::new(
            crate::config::DEFAULT_OLLAMA_URL,
            crate::config::DEFAULT_MODEL_TIMEOUT_SECS,
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> ExtractionError {
        if e.is_connect() {
            ExtractionError::OllamaConnection(self.base_url.clone())
        } else if e.is_timeout() {
            ExtractionError::Timeout(self.timeout_secs)
        } else {
            ExtractionError::HttpClient(e.to_string())
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Request body for Ollama /api/chat (vision)
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<&'a [String]>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, ExtractionError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        tracing::debug!(
            model,
            elapsed_ms = %start.elapsed().as_millis(),
            response_len = parsed.response.len(),
            "Text generation complete"
        );
        Ok(parsed.response)
    }
}

impl VisionClient for OllamaClient {
    fn chat_with_images(
        &self,
        model: &str,
        prompt: &str,
        images: &[String],
        system: Option<&str>,
    ) -> Result<String, ExtractionError> {
        let url = format!("{}/api/chat", self.base_url);

        let mut messages = Vec::new();
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
                images: None,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
            images: Some(images),
        });

        let body = ChatRequest {
            model,
            messages,
            stream: false,
        };

        let start = std::time::Instant::now();
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::OllamaError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        tracing::debug!(
            model,
            elapsed_ms = %start.elapsed().as_millis(),
            image_count = images.len(),
            "Vision chat complete"
        );
        Ok(parsed.message.content)
    }
}

/// Mock text client for testing — returns a configurable response.
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: Option<&str>,
    ) -> Result<String, ExtractionError> {
        Ok(self.response.clone())
    }
}

/// Mock vision client for testing — returns a configurable response.
pub struct MockVisionClient {
    response: String,
}

impl MockVisionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
        }
    }
}

impl VisionClient for MockVisionClient {
    fn chat_with_images(
        &self,
        _model: &str,
        _prompt: &str,
        _images: &[String],
        _system: Option<&str>,
    ) -> Result<String, ExtractionError> {
        Ok(self.response.clone())
    }
}

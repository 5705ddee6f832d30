use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use parlo_config::ModelConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use super::{AudioPayload, ImagePayload, ModelProvider};
use crate::error::SpeechError;
use crate::prompt;
use crate::protocol::{
    ChatContent, ChatMessage, ChatRequest, ChatResponse, ContentPart, ImageUrl, JsonSchemaFormat, ResponseFormat,
    TranscriptionResponse,
};
use crate::types::Language;

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Token budget for image description calls
const DESCRIBE_MAX_TOKENS: u32 = 1000;

/// OpenAI-compatible model provider
pub(crate) struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    chat_model: String,
    transcription_model: String,
}

impl OpenAiProvider {
    /// Create from model configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &ModelConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_idle_timeout(Some(Duration::from_secs(5)))
            .tcp_nodelay(true)
            .build()?;

        let base_url = config
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, url::Url::as_str)
            .trim_end_matches('/')
            .to_owned();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            chat_model: config.chat_model.clone(),
            transcription_model: config.transcription_model.clone(),
        })
    }

    async fn chat(&self, request: ChatRequest) -> crate::error::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| SpeechError::ModelUnavailable(format!("chat request failed: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "model provider returned error");
            return Err(SpeechError::ModelUnavailable(format!("provider returned {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::ModelUnavailable(format!("failed to parse provider response: {e}")))?;

        parsed.into_content().ok_or(SpeechError::EmptyResult)
    }
}

/// Base64 data URI for inline image input
fn data_uri(image: &ImagePayload) -> String {
    format!("data:{};base64,{}", image.content_type, BASE64.encode(&image.bytes))
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    async fn transcribe(&self, audio: AudioPayload) -> crate::error::Result<String> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        tracing::debug!(
            bytes = audio.bytes.len(),
            model = %self.transcription_model,
            "transcription request"
        );

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.bytes)
                    .file_name(audio.filename)
                    .mime_str(&audio.content_type)
                    .map_err(|e| SpeechError::invalid(format!("invalid audio content type: {e}")))?,
            )
            .text("model", self.transcription_model.clone())
            .text("response_format", "json");

        // Omit the language field entirely for auto-detection
        if let Some(code) = audio.language.code() {
            form = form.text("language", code);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SpeechError::ModelUnavailable(format!("transcription request failed: {e}")))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "transcription provider returned error");
            return Err(SpeechError::ModelUnavailable(format!("provider returned {status}: {body}")));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| SpeechError::ModelUnavailable(format!("failed to parse transcription response: {e}")))?;

        if parsed.text.is_empty() {
            return Err(SpeechError::EmptyResult);
        }

        Ok(parsed.text)
    }

    async fn describe(&self, image: ImagePayload, language: Language) -> crate::error::Result<String> {
        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ChatContent::Text(prompt::describe_system(language).to_owned()),
                },
                ChatMessage {
                    role: "user",
                    content: ChatContent::Parts(vec![
                        ContentPart::Text {
                            text: prompt::describe_user(language).to_owned(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl { url: data_uri(&image) },
                        },
                    ]),
                },
            ],
            response_format: None,
            max_tokens: Some(DESCRIBE_MAX_TOKENS),
        };

        self.chat(request).await
    }

    async fn rewrite(
        &self,
        instructions: &str,
        user_text: &str,
        image: Option<ImagePayload>,
    ) -> crate::error::Result<String> {
        let user_content = match image {
            Some(ref payload) => ChatContent::Parts(vec![
                ContentPart::Text {
                    text: user_text.to_owned(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: data_uri(payload) },
                },
            ]),
            None => ChatContent::Text(user_text.to_owned()),
        };

        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ChatContent::Text(instructions.to_owned()),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            response_format: Some(ResponseFormat {
                format_type: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "ImproveResult",
                    strict: true,
                    schema: crate::result::json_schema(),
                },
            }),
            max_tokens: None,
        };

        self.chat(request).await
    }
}

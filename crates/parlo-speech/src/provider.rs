pub(crate) mod openai;

use async_trait::async_trait;

use crate::types::{Language, LanguageHint};

/// Audio payload handed to the model provider
#[derive(Debug)]
pub(crate) struct AudioPayload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    pub language: LanguageHint,
}

/// Image payload handed to the model provider
#[derive(Debug)]
pub(crate) struct ImagePayload {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Trait over the external model's three capabilities
///
/// Implementations perform a single call per operation; retries are the
/// provider's concern, not this layer's.
#[async_trait]
pub(crate) trait ModelProvider: Send + Sync {
    /// Speech-to-text; returns the raw transcript
    async fn transcribe(&self, audio: AudioPayload) -> crate::error::Result<String>;

    /// Natural-language description of an image
    async fn describe(&self, image: ImagePayload, language: Language) -> crate::error::Result<String>;

    /// Schema-constrained rewrite; returns the raw output text for the
    /// response normalizer to parse and validate
    async fn rewrite(
        &self,
        instructions: &str,
        user_text: &str,
        image: Option<ImagePayload>,
    ) -> crate::error::Result<String>;
}

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Model provider configuration (OpenAI-compatible API)
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Base URL override; defaults to the canonical OpenAI API
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Provider API key
    pub api_key: SecretString,
    /// Chat model used for rewrite and image description
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Model used for audio transcription
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    /// Upper bound on a single provider call
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Pass attached images to the model as direct visual input
    ///
    /// When false, images are pre-summarized into a text description
    /// before the rewrite call (fallback for non-vision models).
    #[serde(default = "default_vision_input")]
    pub vision_input: bool,
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_transcription_model() -> String {
    "whisper-1".to_owned()
}

const fn default_timeout() -> u64 {
    120
}

const fn default_vision_input() -> bool {
    true
}

use serde::{Deserialize, Serialize};

use crate::upload::TransientUpload;

/// Practice language for improvement and analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Human-readable label used in prompt text
    pub const fn label(self) -> &'static str {
        match self {
            Self::Korean => "Korean",
            Self::English => "English",
        }
    }

    /// ISO 639-1 code
    pub const fn code(self) -> &'static str {
        match self {
            Self::Korean => "ko",
            Self::English => "en",
        }
    }
}

/// Transcription language hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageHint {
    Ko,
    En,
    #[default]
    Auto,
}

impl LanguageHint {
    /// ISO code to pass to the provider, or `None` for auto-detection
    pub const fn code(self) -> Option<&'static str> {
        match self {
            Self::Ko => Some("ko"),
            Self::En => Some("en"),
            Self::Auto => None,
        }
    }
}

/// Which language the end user is practicing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerMode {
    KoreanLearner,
    EnglishLearner,
}

impl LearnerMode {
    /// Persona label used in prompt text
    pub const fn label(self) -> &'static str {
        match self {
            Self::KoreanLearner => "Korean learner",
            Self::EnglishLearner => "English learner",
        }
    }
}

/// Desired tone of the improved speech
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Formal,
    Casual,
}

impl Tone {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Formal => "formal",
            Self::Casual => "casual",
        }
    }
}

/// Desired length of the improved speech relative to the original
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPreference {
    #[default]
    Similar,
    Shorter,
    Longer,
}

impl LengthPreference {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Similar => "similar",
            Self::Shorter => "shorter",
            Self::Longer => "longer",
        }
    }
}

/// Optional topic context for a practice session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topic {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Optional rewrite preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub length: Option<LengthPreference>,
}

/// Validated body fields of an improve request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovePayload {
    pub language: Language,
    pub learner_mode: LearnerMode,
    pub transcript: String,
    #[serde(default)]
    pub topic: Option<Topic>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

/// One rewrite-and-feedback job
#[derive(Debug)]
pub struct ImproveRequest {
    pub payload: ImprovePayload,
    /// Staged image attachment, when the client sent one
    pub image: Option<TransientUpload>,
}

/// One speech-to-text job
#[derive(Debug)]
pub struct TranscribeRequest {
    pub audio: TransientUpload,
    pub language: LanguageHint,
}

/// One image analysis job
#[derive(Debug)]
pub struct AnalyzeImageRequest {
    pub image: TransientUpload,
    pub language: Language,
    pub learner_mode: LearnerMode,
}

/// Response for a transcription job
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub transcript: String,
    /// Echoed language hint; omitted when auto-detection was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Response for an image analysis job
#[derive(Debug, Serialize)]
pub struct AnalyzeImageResponse {
    /// The model's description of the image
    pub original: String,
    #[serde(flatten)]
    pub result: crate::result::ImproveResult,
}

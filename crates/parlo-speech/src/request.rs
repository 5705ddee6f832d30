use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequest, Multipart, Request};
use serde_json::{Map, Value};

use crate::error::SpeechError;
use crate::server::Server;
use crate::types::{
    AnalyzeImageRequest, ImprovePayload, ImproveRequest, Language, LanguageHint, LearnerMode, TranscribeRequest,
};
use crate::upload::TransientUpload;

/// Body limit for uploads (32 MiB)
pub(crate) const BODY_LIMIT_BYTES: usize = 32 << 20;

/// A text field that may carry a JSON-encoded nested object
///
/// Multipart clients send nested objects (`topic`, `preferences`) as
/// JSON-encoded strings alongside the binary attachment. Each state is
/// handled explicitly: a malformed value degrades to absent rather than
/// aborting the request, and the missing-field check then runs as usual.
#[derive(Debug)]
enum TextField {
    Absent,
    Present(Value),
    Malformed,
}

impl TextField {
    fn parse(field: &str, raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(text)) => {
                if text.trim().is_empty() {
                    return Self::Absent;
                }
                match serde_json::from_str::<Value>(text) {
                    Ok(value @ Value::Object(_)) => Self::Present(value),
                    Ok(_) | Err(_) => {
                        tracing::warn!(field, "dropping malformed nested field");
                        Self::Malformed
                    }
                }
            }
            Some(value) => Self::Present(value.clone()),
        }
    }

    fn into_value(self) -> Option<Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Malformed => None,
        }
    }
}

/// Whether a field holds a usable non-empty string
fn has_text(map: &Map<String, Value>, key: &str) -> bool {
    matches!(map.get(key), Some(Value::String(s)) if !s.is_empty())
}

/// Validate untyped improve fields into a typed payload
///
/// Shared by the JSON and multipart paths. Names every missing required
/// field in the error details.
fn improve_payload_from_map(mut map: Map<String, Value>) -> Result<ImprovePayload, SpeechError> {
    for key in ["topic", "preferences"] {
        let parsed = TextField::parse(key, map.get(key)).into_value();
        match parsed {
            Some(value) => map.insert(key.to_owned(), value),
            None => map.remove(key),
        };
    }

    let missing: Vec<&str> = ["language", "learnerMode", "transcript"]
        .into_iter()
        .filter(|key| !has_text(&map, key))
        .collect();

    if !missing.is_empty() {
        return Err(SpeechError::InvalidRequest {
            message: format!("missing required fields: {}", missing.join(", ")),
            details: Some(serde_json::json!({ "missing": missing })),
        });
    }

    serde_json::from_value(Value::Object(map)).map_err(|e| SpeechError::invalid(e.to_string()))
}

fn parse_enum_field<T: serde::de::DeserializeOwned>(field: &str, raw: &str) -> Result<T, SpeechError> {
    serde_json::from_value(Value::String(raw.to_owned()))
        .map_err(|_| SpeechError::invalid(format!("invalid value for field '{field}': {raw}")))
}

fn stage(server: &Server, filename: &str, content_type: &str, bytes: &[u8]) -> Result<TransientUpload, SpeechError> {
    TransientUpload::stage(server.staging_dir(), filename, content_type, bytes)
        .map_err(|e| SpeechError::Internal(anyhow::anyhow!("failed to stage upload: {e}")))
}

fn require_multipart(request: &Request<Body>) -> Result<(), SpeechError> {
    let content_type = request
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        Ok(())
    } else {
        Err(SpeechError::invalid(
            "unsupported Content-Type, expected multipart/form-data",
        ))
    }
}

async fn read_field_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, SpeechError> {
    field
        .text()
        .await
        .map_err(|e| SpeechError::invalid(format!("failed to read field '{name}': {e}")))
}

/// Extractor for `POST /v1/transcribe` multipart bodies
pub struct ExtractTranscribe(pub TranscribeRequest);

impl FromRequest<Arc<Server>> for ExtractTranscribe {
    type Rejection = SpeechError;

    async fn from_request(request: Request<Body>, state: &Arc<Server>) -> Result<Self, Self::Rejection> {
        require_multipart(&request)?;

        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| SpeechError::invalid(format!("failed to parse multipart form: {e}")))?;

        let mut audio: Option<TransientUpload> = None;
        let mut language = LanguageHint::Auto;

        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or("").to_owned();

            match name.as_str() {
                "audio" => {
                    let filename = field.file_name().unwrap_or("audio.m4a").to_owned();
                    let content_type = field.content_type().unwrap_or("audio/m4a").to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| SpeechError::invalid(format!("failed to read audio data: {e}")))?;
                    audio = Some(stage(state, &filename, &content_type, &bytes)?);
                }
                "language" => {
                    let raw = read_field_text(field, "language").await?;
                    language = parse_enum_field("language", &raw)?;
                }
                _ => {
                    // Skip unknown fields
                }
            }
        }

        let audio = audio.ok_or_else(|| SpeechError::InvalidRequest {
            message: "missing required fields: audio".to_owned(),
            details: Some(serde_json::json!({ "missing": ["audio"] })),
        })?;

        Ok(Self(TranscribeRequest { audio, language }))
    }
}

/// Extractor for `POST /v1/improve` bodies, multipart or JSON
pub struct ExtractImprove(pub ImproveRequest);

impl FromRequest<Arc<Server>> for ExtractImprove {
    type Rejection = SpeechError;

    async fn from_request(request: Request<Body>, state: &Arc<Server>) -> Result<Self, Self::Rejection> {
        let content_type = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned();

        if content_type.starts_with("application/json") {
            let bytes = axum::body::to_bytes(request.into_body(), BODY_LIMIT_BYTES)
                .await
                .map_err(|e| SpeechError::invalid(format!("failed to read request body: {e}")))?;

            let value: Value = serde_json::from_slice(&bytes)
                .map_err(|e| SpeechError::invalid(format!("invalid JSON body: {e}")))?;

            let Value::Object(map) = value else {
                return Err(SpeechError::invalid("request body must be a JSON object"));
            };

            let payload = improve_payload_from_map(map)?;
            return Ok(Self(ImproveRequest { payload, image: None }));
        }

        require_multipart(&request)?;

        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| SpeechError::invalid(format!("failed to parse multipart form: {e}")))?;

        let mut map = Map::new();
        let mut image: Option<TransientUpload> = None;

        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or("").to_owned();

            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or("image.jpg").to_owned();
                    let content_type = field.content_type().unwrap_or("image/jpeg").to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| SpeechError::invalid(format!("failed to read image data: {e}")))?;
                    image = Some(stage(state, &filename, &content_type, &bytes)?);
                }
                "language" | "learnerMode" | "transcript" | "topic" | "preferences" => {
                    let text = read_field_text(field, &name).await?;
                    map.insert(name, Value::String(text));
                }
                _ => {
                    // Skip unknown fields
                }
            }
        }

        let payload = improve_payload_from_map(map)?;

        Ok(Self(ImproveRequest { payload, image }))
    }
}

/// Extractor for `POST /v1/analyze-image` multipart bodies
pub struct ExtractAnalyzeImage(pub AnalyzeImageRequest);

impl FromRequest<Arc<Server>> for ExtractAnalyzeImage {
    type Rejection = SpeechError;

    async fn from_request(request: Request<Body>, state: &Arc<Server>) -> Result<Self, Self::Rejection> {
        require_multipart(&request)?;

        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| SpeechError::invalid(format!("failed to parse multipart form: {e}")))?;

        let mut image: Option<TransientUpload> = None;
        let mut language: Option<Language> = None;
        let mut learner_mode: Option<LearnerMode> = None;

        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or("").to_owned();

            match name.as_str() {
                "image" => {
                    let filename = field.file_name().unwrap_or("image.jpg").to_owned();
                    let content_type = field.content_type().unwrap_or("image/jpeg").to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| SpeechError::invalid(format!("failed to read image data: {e}")))?;
                    image = Some(stage(state, &filename, &content_type, &bytes)?);
                }
                "language" => {
                    let raw = read_field_text(field, "language").await?;
                    language = Some(parse_enum_field("language", &raw)?);
                }
                "learnerMode" => {
                    let raw = read_field_text(field, "learnerMode").await?;
                    learner_mode = Some(parse_enum_field("learnerMode", &raw)?);
                }
                _ => {
                    // Skip unknown fields
                }
            }
        }

        let missing: Vec<&str> = [
            ("image", image.is_none()),
            ("language", language.is_none()),
            ("learnerMode", learner_mode.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            return Err(SpeechError::InvalidRequest {
                message: format!("missing required fields: {}", missing.join(", ")),
                details: Some(serde_json::json!({ "missing": missing })),
            });
        }

        // Checked non-empty above
        Ok(Self(AnalyzeImageRequest {
            image: image.expect("image presence checked"),
            language: language.expect("language presence checked"),
            learner_mode: learner_mode.expect("learnerMode presence checked"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::types::{LengthPreference, Tone};

    fn base_map() -> Map<String, Value> {
        let Value::Object(map) = json!({
            "language": "en",
            "learnerMode": "english_learner",
            "transcript": "i go to store yesterday",
        }) else {
            unreachable!()
        };
        map
    }

    #[test]
    fn minimal_payload_validates() {
        let payload = improve_payload_from_map(base_map()).unwrap();
        assert_eq!(payload.language, Language::English);
        assert_eq!(payload.learner_mode, LearnerMode::EnglishLearner);
        assert!(payload.topic.is_none());
        assert!(payload.preferences.is_none());
    }

    #[test]
    fn missing_fields_all_named() {
        let err = improve_payload_from_map(Map::new()).unwrap_err();
        let SpeechError::InvalidRequest { details, .. } = err else {
            panic!("expected InvalidRequest");
        };
        let missing = details.unwrap();
        assert_eq!(missing["missing"], json!(["language", "learnerMode", "transcript"]));
    }

    #[test]
    fn empty_transcript_rejected() {
        let mut map = base_map();
        map.insert("transcript".to_owned(), json!(""));
        let err = improve_payload_from_map(map).unwrap_err();
        assert!(matches!(err, SpeechError::InvalidRequest { .. }));
    }

    #[test]
    fn invalid_language_rejected() {
        let mut map = base_map();
        map.insert("language".to_owned(), json!("fr"));
        assert!(improve_payload_from_map(map).is_err());
    }

    #[test]
    fn string_encoded_preferences_parse() {
        let mut map = base_map();
        map.insert(
            "preferences".to_owned(),
            json!("{\"tone\":\"formal\",\"length\":\"shorter\"}"),
        );
        let payload = improve_payload_from_map(map).unwrap();
        let prefs = payload.preferences.unwrap();
        assert_eq!(prefs.tone, Some(Tone::Formal));
        assert_eq!(prefs.length, Some(LengthPreference::Shorter));
    }

    #[test]
    fn malformed_topic_degrades_to_absent() {
        let mut map = base_map();
        map.insert("topic".to_owned(), json!("{not json"));
        let payload = improve_payload_from_map(map).unwrap();
        assert!(payload.topic.is_none());
    }

    #[test]
    fn malformed_topic_does_not_mask_missing_transcript() {
        let mut map = base_map();
        map.remove("transcript");
        map.insert("topic".to_owned(), json!("{not json"));

        let err = improve_payload_from_map(map).unwrap_err();
        let SpeechError::InvalidRequest { details, .. } = err else {
            panic!("expected InvalidRequest");
        };
        assert_eq!(details.unwrap()["missing"], json!(["transcript"]));
    }

    #[test]
    fn object_topic_passes_through() {
        let mut map = base_map();
        map.insert("topic".to_owned(), json!({ "title": "Travel", "prompt": "Describe a trip" }));
        let payload = improve_payload_from_map(map).unwrap();
        assert_eq!(payload.topic.unwrap().title.as_deref(), Some("Travel"));
    }

    #[test]
    fn invalid_tone_inside_preferences_rejected() {
        let mut map = base_map();
        map.insert("preferences".to_owned(), json!({ "tone": "sarcastic" }));
        assert!(improve_payload_from_map(map).is_err());
    }
}

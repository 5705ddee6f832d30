use std::path::{Path, PathBuf};

use parlo_config::PromptPolicy;

use crate::error::SpeechError;
use crate::prompt::{self, ImageContext, PromptInput};
use crate::provider::{AudioPayload, ImagePayload, ModelProvider, openai::OpenAiProvider};
use crate::result::{self, ImproveResult};
use crate::types::{AnalyzeImageRequest, AnalyzeImageResponse, ImproveRequest, TranscribeRequest, TranscribeResponse};
use crate::upload::TransientUpload;

/// Speech pipeline server shared by the three endpoints
///
/// Each request runs the same sequence: read the staged upload (at most
/// once), build the instruction string, invoke the model, normalize the
/// output. No state crosses requests.
pub struct Server {
    provider: Box<dyn ModelProvider>,
    policy: PromptPolicy,
    vision_input: bool,
    staging_dir: PathBuf,
}

impl Server {
    pub(crate) fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Run a speech-to-text job
    pub(crate) async fn transcribe(&self, request: TranscribeRequest) -> crate::error::Result<TranscribeResponse> {
        let TranscribeRequest { audio, language } = request;

        let transcript = self
            .provider
            .transcribe(audio_payload(audio, language)?)
            .await?;

        Ok(TranscribeResponse {
            transcript,
            language: language.code().map(str::to_owned),
        })
    }

    /// Run a rewrite-and-feedback job
    pub(crate) async fn improve(&self, request: ImproveRequest) -> crate::error::Result<ImproveResult> {
        let ImproveRequest { payload, image } = request;
        let has_image = image.is_some();

        let image = image.map(image_payload).transpose()?;

        // Direct vision input when the model supports it; pre-summarizing
        // into text is the configured fallback
        let mut rewrite_image = None;
        let mut description = None;
        if let Some(img) = image {
            if self.vision_input {
                rewrite_image = Some(img);
            } else {
                description = Some(self.provider.describe(img, payload.language).await?);
            }
        }

        let image_context = match (&rewrite_image, &description) {
            (Some(_), _) => ImageContext::Attached,
            (None, Some(text)) => ImageContext::Described(text),
            (None, None) => ImageContext::None,
        };

        let preferences = payload.preferences.unwrap_or_default();
        let input = PromptInput {
            language: payload.language,
            learner_mode: payload.learner_mode,
            topic: payload.topic.as_ref(),
            tone: preferences.tone.unwrap_or_default(),
            length: preferences.length.unwrap_or_default(),
            image: image_context,
        };

        let instructions = prompt::improve_instructions(&input, self.policy);
        let user_text = prompt::rewrite_user_text(payload.language, &payload.transcript, has_image);

        let raw = self.provider.rewrite(&instructions, &user_text, rewrite_image).await?;

        result::normalize(&raw)
    }

    /// Run an image analysis job: describe, then improve the description
    pub(crate) async fn analyze_image(
        &self,
        request: AnalyzeImageRequest,
    ) -> crate::error::Result<AnalyzeImageResponse> {
        let AnalyzeImageRequest {
            image,
            language,
            learner_mode,
        } = request;

        let description = self.provider.describe(image_payload(image)?, language).await?;

        let input = PromptInput {
            language,
            learner_mode,
            topic: None,
            tone: crate::types::Tone::default(),
            length: crate::types::LengthPreference::default(),
            image: ImageContext::None,
        };

        let instructions = prompt::improve_instructions(&input, self.policy);
        let user_text = prompt::analyze_user_text(language, &description);

        let raw = self.provider.rewrite(&instructions, &user_text, None).await?;
        let result = result::normalize(&raw)?;

        Ok(AnalyzeImageResponse {
            original: description,
            result,
        })
    }
}

fn audio_payload(upload: TransientUpload, language: crate::types::LanguageHint) -> crate::error::Result<AudioPayload> {
    let filename = upload.filename().to_owned();
    let content_type = upload.content_type().to_owned();
    let bytes = upload
        .read()
        .map_err(|e| SpeechError::Internal(anyhow::anyhow!("failed to read staged audio: {e}")))?;

    Ok(AudioPayload {
        bytes,
        filename,
        content_type,
        language,
    })
}

fn image_payload(upload: TransientUpload) -> crate::error::Result<ImagePayload> {
    let content_type = upload.content_type().to_owned();
    let bytes = upload
        .read()
        .map_err(|e| SpeechError::Internal(anyhow::anyhow!("failed to read staged image: {e}")))?;

    Ok(ImagePayload { bytes, content_type })
}

/// Builder for constructing the speech server from configuration
pub(crate) struct SpeechServerBuilder<'a> {
    config: &'a parlo_config::Config,
}

impl<'a> SpeechServerBuilder<'a> {
    pub fn new(config: &'a parlo_config::Config) -> Self {
        Self { config }
    }

    pub fn build(self) -> anyhow::Result<Server> {
        let provider = OpenAiProvider::new(&self.config.model)?;

        let staging_dir = self.config.uploads.staging_dir();
        std::fs::create_dir_all(&staging_dir)
            .map_err(|e| anyhow::anyhow!("failed to create staging directory {}: {e}", staging_dir.display()))?;

        tracing::debug!(
            staging_dir = %staging_dir.display(),
            policy = ?self.config.coach.policy,
            vision_input = self.config.model.vision_input,
            "speech server initialized"
        );

        Ok(Server {
            provider: Box::new(provider),
            policy: self.config.coach.policy,
            vision_input: self.config.model.vision_input,
            staging_dir,
        })
    }
}

#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod error;
mod prompt;
mod protocol;
mod provider;
mod request;
mod result;
mod server;
mod types;
mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{Json, Router, extract::State, routing::post};

pub use error::{Result, SpeechError};
pub use result::{Alternatives, Feedback, FillerWords, ImproveResult, Revision};
pub use server::Server;
pub use types::{
    AnalyzeImageRequest, AnalyzeImageResponse, ImprovePayload, ImproveRequest, Language, LanguageHint, LearnerMode,
    LengthPreference, Preferences, Tone, Topic, TranscribeRequest, TranscribeResponse,
};
pub use upload::TransientUpload;

use request::{ExtractAnalyzeImage, ExtractImprove, ExtractTranscribe};
use server::SpeechServerBuilder;

/// Build the speech server from configuration
///
/// # Errors
///
/// Returns an error if the provider client or staging directory cannot
/// be initialized
pub fn build_server(config: &parlo_config::Config) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        SpeechServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize speech server: {e}"))?,
    );
    Ok(server)
}

/// Create the endpoint router for the speech pipeline
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/v1/transcribe", post(transcribe))
        .route("/v1/improve", post(improve))
        .route("/v1/analyze-image", post(analyze_image))
        .layer(DefaultBodyLimit::max(request::BODY_LIMIT_BYTES))
}

/// Handle transcription requests
async fn transcribe(
    State(server): State<Arc<Server>>,
    ExtractTranscribe(request): ExtractTranscribe,
) -> Result<Json<TranscribeResponse>> {
    tracing::debug!(size = request.audio.size(), "transcribe handler called");

    let response = server.transcribe(request).await?;

    tracing::debug!("transcription complete");

    Ok(Json(response))
}

/// Handle rewrite-and-feedback requests
async fn improve(
    State(server): State<Arc<Server>>,
    ExtractImprove(request): ExtractImprove,
) -> Result<Json<ImproveResult>> {
    tracing::debug!(
        transcript_len = request.payload.transcript.len(),
        has_image = request.image.is_some(),
        "improve handler called"
    );

    let result = server.improve(request).await?;

    tracing::debug!("improvement complete");

    Ok(Json(result))
}

/// Handle image analysis requests
async fn analyze_image(
    State(server): State<Arc<Server>>,
    ExtractAnalyzeImage(request): ExtractAnalyzeImage,
) -> Result<Json<AnalyzeImageResponse>> {
    tracing::debug!(size = request.image.size(), "analyze-image handler called");

    let response = server.analyze_image(request).await?;

    tracing::debug!("image analysis complete");

    Ok(Json(response))
}

use axum::Json;
use axum::response::IntoResponse;

/// Service descriptor listing the available endpoints
pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Parlo API",
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "transcribe": "/v1/transcribe",
            "improve": "/v1/improve",
            "analyzeImage": "/v1/analyze-image",
        },
    }))
}

use axum::Json;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use parlo_auth::IdentityVerifier;

/// Authenticate `/v1/*` requests via bearer ID token
///
/// Extracts the token from the Authorization header and verifies it
/// against the identity service before any body parsing happens. The
/// resolved identity is attached as a request extension for handlers.
/// Non-`/v1` paths (health, descriptor) pass through untouched.
pub async fn auth_middleware(verifier: IdentityVerifier, request: Request, next: Next) -> Response {
    if !request.uri().path().starts_with("/v1/") {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = token else {
        return unauthorized("Missing or invalid Authorization header. Expected: Bearer <token>");
    };

    if token.is_empty() {
        return unauthorized("Missing token");
    }

    match verifier.verify(token).await {
        Ok(user) => {
            tracing::debug!(uid = %user.uid, "request authenticated");
            let mut request = request;
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(error = %e, "token verification failed");
            unauthorized("Invalid or expired token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "authentication_error",
            "message": message,
        })),
    )
        .into_response()
}

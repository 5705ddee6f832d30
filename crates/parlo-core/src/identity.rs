use serde::{Deserialize, Serialize};

/// Caller identity derived from a verified bearer token
///
/// Attached to the request as an axum extension by the auth middleware
/// and discarded when the response is sent. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Opaque subject identifier from the identity service
    pub uid: String,
    /// Email address, when the identity service exposes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

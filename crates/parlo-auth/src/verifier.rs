use std::fmt::Write as _;
use std::time::Duration;

use mini_moka::sync::Cache;
use parlo_config::IdentityConfig;
use parlo_core::AuthenticatedUser;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::AuthError;

/// Lookup response from the identity service
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Verifies bearer ID tokens against the external identity service
///
/// Successful verifications are cached for the configured TTL so repeated
/// requests from the same session do not round-trip to the identity
/// service. Tokens are cached under their SHA-256 digest, never in the
/// clear.
#[derive(Clone)]
pub struct IdentityVerifier {
    http: reqwest::Client,
    lookup_url: url::Url,
    api_key: SecretString,
    cache: Cache<String, AuthenticatedUser>,
}

impl IdentityVerifier {
    /// Build a verifier from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the lookup
    /// URL cannot be derived from the configured base URL
    pub fn new(config: &IdentityConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let lookup_url = format!("{}/accounts:lookup", config.base_url.as_str().trim_end_matches('/'))
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid identity base URL: {e}"))?;

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .max_capacity(config.cache_capacity)
            .build();

        Ok(Self {
            http,
            lookup_url,
            api_key: config.api_key.clone(),
            cache,
        })
    }

    /// Verify a bearer ID token and resolve the caller's identity
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the token is invalid, expired, or the
    /// identity service is unreachable
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let cache_key = sha256_hex(token);

        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached);
        }

        let response = self
            .http
            .post(self.lookup_url.clone())
            .query(&[("key", self.api_key.expose_secret())])
            .json(&serde_json::json!({ "idToken": token }))
            .send()
            .await?;

        let status = response.status();

        // The identity service reports bad tokens as 400 with an error body
        if status.as_u16() == 400 {
            return Err(AuthError::InvalidToken);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let lookup: LookupResponse = response.json().await.map_err(|e| AuthError::ServiceError {
            status: 0,
            message: format!("failed to parse response: {e}"),
        })?;

        let Some(user) = lookup.users.into_iter().next() else {
            return Err(AuthError::InvalidToken);
        };

        let identity = AuthenticatedUser {
            uid: user.local_id,
            email: user.email,
        };

        tracing::debug!(uid = %identity.uid, "token verified");
        self.cache.insert(cache_key, identity.clone());

        Ok(identity)
    }

    /// Remove a cached verification (e.g. after revocation)
    pub fn invalidate(&self, token: &str) {
        self.cache.invalidate(&sha256_hex(token));
    }
}

/// Compute the SHA-256 hex digest of a string
fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(64);
    for byte in digest {
        // Writing hex to a String is infallible
        write!(hex, "{byte:02x}").unwrap();
    }
    hex
}

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// External identity service used to verify bearer ID tokens
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Base URL of the token verification API
    pub base_url: Url,
    /// API key passed as a query parameter on lookup calls
    pub api_key: SecretString,
    /// How long a verified token stays cached
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached verifications
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
    /// Verification request timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

const fn default_cache_ttl() -> u64 {
    300
}

const fn default_cache_capacity() -> u64 {
    10_000
}

const fn default_timeout() -> u64 {
    5
}

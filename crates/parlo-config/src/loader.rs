use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded =
            crate::env::expand_env(&raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a credential is empty or a bound is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.identity.api_key.expose_secret().is_empty() {
            anyhow::bail!("identity.api_key must not be empty");
        }

        if self.identity.cache_ttl_seconds == 0 {
            anyhow::bail!("identity.cache_ttl_seconds must be greater than 0");
        }

        if self.identity.cache_capacity > 1_000_000 {
            anyhow::bail!("identity.cache_capacity exceeds maximum of 1,000,000");
        }

        if self.model.api_key.expose_secret().is_empty() {
            anyhow::bail!("model.api_key must not be empty");
        }

        if self.model.timeout_seconds == 0 {
            anyhow::bail!("model.timeout_seconds must be greater than 0");
        }

        Ok(())
    }
}

//! Configuration builder for integration tests

use std::path::PathBuf;

use parlo_config::{
    CoachConfig, Config, HealthConfig, IdentityConfig, ModelConfig, PromptPolicy, ServerConfig,
    UploadsConfig,
};
use secrecy::SecretString;

/// Builds a `Config` wired to the mock backends
pub struct ConfigBuilder {
    identity_url: String,
    model_url: String,
    staging_dir: Option<PathBuf>,
    health_enabled: bool,
    policy: PromptPolicy,
    vision_input: bool,
}

impl ConfigBuilder {
    pub fn new(identity_url: &str, model_url: &str) -> Self {
        Self {
            identity_url: identity_url.to_owned(),
            model_url: model_url.to_owned(),
            staging_dir: None,
            health_enabled: true,
            policy: PromptPolicy::Proactive,
            vision_input: true,
        }
    }

    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn health_enabled(mut self, enabled: bool) -> Self {
        self.health_enabled = enabled;
        self
    }

    pub fn policy(mut self, policy: PromptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn vision_input(mut self, enabled: bool) -> Self {
        self.vision_input = enabled;
        self
    }

    pub fn build(self) -> anyhow::Result<Config> {
        Ok(Config {
            server: ServerConfig {
                listen_address: None,
                health: HealthConfig {
                    enabled: self.health_enabled,
                    path: "/health".to_owned(),
                },
                cors: None,
            },
            identity: IdentityConfig {
                base_url: self.identity_url.parse()?,
                api_key: SecretString::from("test-identity-key"),
                cache_ttl_seconds: 300,
                cache_capacity: 100,
                timeout_seconds: 5,
            },
            model: ModelConfig {
                base_url: Some(self.model_url.parse()?),
                api_key: SecretString::from("test-model-key"),
                chat_model: "gpt-4o-mini".to_owned(),
                transcription_model: "whisper-1".to_owned(),
                timeout_seconds: 10,
                vision_input: self.vision_input,
            },
            coach: CoachConfig { policy: self.policy },
            uploads: UploadsConfig {
                dir: self.staging_dir,
            },
        })
    }
}

#![allow(clippy::must_use_candidate)]

pub mod coach;
mod env;
pub mod health;
pub mod identity;
mod loader;
pub mod model;
pub mod server;
pub mod uploads;

use serde::Deserialize;

pub use coach::{CoachConfig, PromptPolicy};
pub use health::HealthConfig;
pub use identity::IdentityConfig;
pub use model::ModelConfig;
pub use server::{AnyOrArray, CorsConfig, ServerConfig};
pub use uploads::UploadsConfig;

/// Top-level Parlo configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// External identity service used for bearer token verification
    pub identity: IdentityConfig,
    /// Model provider configuration
    pub model: ModelConfig,
    /// Coaching behavior (prompt policy)
    #[serde(default)]
    pub coach: CoachConfig,
    /// Staged upload handling
    #[serde(default)]
    pub uploads: UploadsConfig,
}

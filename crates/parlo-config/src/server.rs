use std::net::SocketAddr;

use serde::Deserialize;

use crate::health::HealthConfig;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}

/// CORS settings applied to all routes
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    #[serde(default)]
    pub origins: AnyOrArray,
    #[serde(default)]
    pub methods: AnyOrArray,
    #[serde(default)]
    pub headers: AnyOrArray,
    #[serde(default)]
    pub credentials: bool,
}

/// Either the literal string "any" or an explicit list
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
pub enum AnyOrArray {
    #[default]
    Any,
    List(Vec<String>),
}

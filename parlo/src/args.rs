use std::path::PathBuf;

use clap::Parser;

/// Parlo speech-practice gateway
#[derive(Debug, Parser)]
#[command(name = "parlo", about = "Backend gateway for the Parlo speech-practice app")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "parlo.toml", env = "PARLO_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PARLO_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}

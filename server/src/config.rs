use std::{net::SocketAddr, time::Duration};

use api::{
    config::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS},
    ApiConfig,
};
use clap::Parser;

/// Command line and environment settings for the postbox server.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "postbox", version, about = "Browser-based HTTP request tester")]
pub struct Cli {
    /// SQLite database holding the request history. Created if missing.
    #[arg(long, env = "POSTBOX_DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    pub database_url: String,

    /// Address the HTTP server listens on.
    #[arg(long, env = "POSTBOX_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Upper bound, in seconds, on each outbound request.
    #[arg(long, env = "POSTBOX_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "POSTBOX_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

impl Cli {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

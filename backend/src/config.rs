//! Runtime configuration.
//!
//! Flat env/CLI settings parsed once at startup; flags override the
//! environment.

use clap::Parser;

/// Notice service configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "school-connect-backend", about = "School-Connect notice service")]
pub struct Config {
    /// Socket address to bind the HTTP server to.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: String,

    /// MongoDB connection URL; in-memory stores are used when absent.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Database name used when the URL does not name one.
    #[arg(long, env = "DATABASE_NAME", default_value = "school_connect")]
    pub database_name: String,

    /// Push gateway endpoint; deliveries are dropped when absent.
    #[arg(long, env = "PUSH_GATEWAY_URL")]
    pub push_gateway_url: Option<String>,

    /// Origins allowed to open browser WebSocket connections
    /// (comma-separated; localhost with an explicit port is always allowed).
    #[arg(long = "allowed-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    /// Seed for deterministic sample notices at startup.
    #[cfg(feature = "example-data")]
    #[arg(long, env = "SEED_NOTICES")]
    pub seed_notices: Option<u64>,

    /// How many sample notices to seed.
    #[cfg(feature = "example-data")]
    #[arg(long, env = "SEED_NOTICE_COUNT", default_value_t = 3)]
    pub seed_notice_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_original_deployment() {
        let config = Config::try_parse_from(["backend"]).expect("defaults parse");
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert!(config.database_url.is_none());
        assert!(config.allowed_origins.is_empty());
    }

    #[test]
    fn origins_split_on_commas() {
        let config = Config::try_parse_from([
            "backend",
            "--allowed-origin",
            "https://a.example.edu,https://b.example.edu",
        ])
        .expect("origins parse");
        assert_eq!(config.allowed_origins.len(), 2);
    }
}

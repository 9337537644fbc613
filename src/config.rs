//! Configuration module for the market data handler.

use serde::Deserialize;
use std::env;

use crate::error::MarketDataError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the ITCH feed to replay.
    pub feed_path: String,

    /// Restrict the book to one symbol (e.g. "AAPL"); all symbols when unset.
    pub symbol: Option<String>,

    /// Order pool capacity (resting orders per book).
    pub pool_capacity: usize,

    /// Price levels to pre-size each ladder for.
    pub depth_hint: usize,

    /// Whether the feed is wrapped in transport framing (PCAP/UDP capture)
    /// that must be probed away, or is a raw ITCH stream.
    pub probe_framing: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            feed_path: env::var("FEED_PATH").unwrap_or_else(|_| "itch.bin".to_string()),
            symbol: env::var("SYMBOL").ok().filter(|s| !s.is_empty()),
            pool_capacity: env::var("POOL_CAPACITY")
                .unwrap_or_else(|_| "1000000".to_string())
                .parse()
                .unwrap_or(1_000_000),
            depth_hint: env::var("DEPTH_HINT")
                .unwrap_or_else(|_| "64".to_string())
                .parse()
                .unwrap_or(64),
            probe_framing: env::var("PROBE_FRAMING")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        if config.pool_capacity == 0 {
            return Err(MarketDataError::Config(
                "POOL_CAPACITY must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_path: "itch.bin".to_string(),
            symbol: None,
            pool_capacity: 1_000_000,
            depth_hint: 64,
            probe_framing: false,
        }
    }
}

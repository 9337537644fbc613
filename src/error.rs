//! Error types for the market data handler.
//!
//! Decoder and book outcomes are plain return values ([`crate::itch::ParseResult`],
//! `bool`); this error type covers the crate's edges — configuration, file
//! I/O, and transport framing.

use thiserror::Error;

/// Market data handler errors.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no ITCH payload found in {packet_len}-byte packet")]
    Framing { packet_len: usize },
}

pub type Result<T> = std::result::Result<T, MarketDataError>;

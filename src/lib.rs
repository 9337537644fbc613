//! ITCH market data handler library.
//!
//! This crate provides low-latency handling of NASDAQ TotalView-ITCH 5.0
//! market data: a zero-copy decoder for the wire protocol and a
//! price-time-priority limit order book with an integrated matching
//! engine.
//!
//! The hot path — decode, add, cancel, match — performs no heap
//! allocation: decoded messages are views over the input buffer, and
//! resting orders live in a pool sized at construction. Everything is
//! single-threaded and synchronous; shard by instrument across independent
//! instances to scale out.

pub mod config;
pub mod error;
pub mod feed;
pub mod itch;
pub mod orderbook;

pub use config::Config;
pub use error::{MarketDataError, Result};
pub use feed::{find_itch_offset, BookFeed, FeedStats};
pub use itch::{parse_one, parse_stream, MessageHandler, ParseResult};
pub use orderbook::{BookMetrics, Execution, OrderBook, Side};

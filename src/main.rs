//! ITCH market data handler binary.
//!
//! Replays an ITCH 5.0 feed from disk through the decoder into an order
//! book and reports the resulting book state.

use std::fs;

use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use itch_handler::error::MarketDataError;
use itch_handler::{feed, itch, BookFeed, Config, OrderBook};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("starting ITCH market data handler");

    let config = Config::load()?;
    info!(
        feed = %config.feed_path,
        symbol = config.symbol.as_deref().unwrap_or("*"),
        pool_capacity = config.pool_capacity,
        "configuration loaded"
    );

    let data = fs::read(&config.feed_path)?;
    let payload = if config.probe_framing {
        let offset = feed::find_itch_offset(&data).ok_or(MarketDataError::Framing {
            packet_len: data.len(),
        })?;
        info!(offset, "located ITCH payload behind transport framing");
        &data[offset..]
    } else {
        &data[..]
    };

    let book = OrderBook::with_capacity_and_depth(config.pool_capacity, config.depth_hint);
    let mut book_feed = match &config.symbol {
        Some(symbol) => BookFeed::with_symbol(book, symbol),
        None => BookFeed::new(book),
    };

    let consumed = itch::parse_stream(payload, &mut book_feed);
    if consumed < payload.len() {
        warn!(
            consumed,
            total = payload.len(),
            "stopped before the end of the feed"
        );
    }

    let stats = book_feed.stats();
    let metrics = book_feed.book().metrics();
    info!(
        messages = stats.messages,
        adds = stats.adds,
        fills = stats.fills,
        rejects = stats.rejects,
        unknown = stats.unknown,
        "replay complete"
    );
    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}

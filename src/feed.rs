//! Feed-side collaborators: transport framing recognition and the replay
//! driver that wires the decoder to an order book.
//!
//! Captured packets wrap the ITCH payload in Ethernet/IP/UDP and sometimes
//! VLAN tags or MoldUDP64; [`find_itch_offset`] probes the common layouts
//! so a capture can be fed straight into the parser. [`BookFeed`] is the
//! reference [`MessageHandler`]: it applies add/execute messages to a
//! single-instrument book and keeps replay counters.

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::itch::messages::{self, AddOrder, MessageHeader, OrderExecuted};
use crate::itch::MessageHandler;
use crate::orderbook::{OrderBook, Side};

/// Fixed offsets where an ITCH payload commonly starts inside a captured
/// packet: plain UDP, VLAN-tagged, and MoldUDP64 with/without a length
/// prefix.
const PROBE_OFFSETS: [usize; 6] = [42, 46, 62, 64, 66, 68];

/// Bound for the fallback linear scan.
const SCAN_LIMIT: usize = 100;

/// Whether `byte` is an ITCH 5.0 message type code.
pub fn is_recognized_type(byte: u8) -> bool {
    messages::message_size(byte).is_some()
}

/// Locate the start of the ITCH payload inside a framed packet.
///
/// Tries the fixed offsets first, accepting the first one holding a
/// recognized type byte; falls back to scanning the leading
/// [`SCAN_LIMIT`] bytes for a recognized type byte followed by a plausible
/// stock locate in (0, 10 000). Returns `None` when nothing plausible is
/// found.
pub fn find_itch_offset(data: &[u8]) -> Option<usize> {
    for &offset in &PROBE_OFFSETS {
        if offset < data.len() && is_recognized_type(data[offset]) {
            return Some(offset);
        }
    }

    let end = data.len().min(SCAN_LIMIT);
    for offset in 0..end {
        if is_recognized_type(data[offset]) && plausible_locate(data, offset) {
            return Some(offset);
        }
    }

    None
}

fn plausible_locate(data: &[u8], offset: usize) -> bool {
    match data.get(offset + 1..offset + 3) {
        Some(bytes) => {
            let locate = u16::from_be_bytes([bytes[0], bytes[1]]);
            locate > 0 && locate < 10_000
        }
        None => false,
    }
}

/// Replay counters kept by [`BookFeed`].
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct FeedStats {
    /// Typed messages seen (add, execute, system event).
    pub messages: u64,
    /// Orders entered into the book.
    pub adds: u64,
    /// Fills observed: matches produced by the book plus applied
    /// exchange-reported executions.
    pub fills: u64,
    /// Adds rejected by the book (duplicate id or pool exhausted).
    pub rejects: u64,
    /// Messages with an unrecognized type byte.
    pub unknown: u64,
}

/// Applies a decoded ITCH stream to a single-instrument order book.
///
/// With a symbol filter, only add orders for that symbol reach the book;
/// executions for other instruments fall out naturally because their order
/// references are never resting.
pub struct BookFeed {
    book: OrderBook,
    symbol: Option<String>,
    stats: FeedStats,
}

impl BookFeed {
    /// Feed every add order into `book`, regardless of symbol.
    pub fn new(book: OrderBook) -> Self {
        Self {
            book,
            symbol: None,
            stats: FeedStats::default(),
        }
    }

    /// Feed only add orders whose symbol exactly matches `symbol`.
    pub fn with_symbol(book: OrderBook, symbol: impl Into<String>) -> Self {
        Self {
            book,
            symbol: Some(symbol.into()),
            stats: FeedStats::default(),
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn into_book(self) -> OrderBook {
        self.book
    }

    pub fn stats(&self) -> FeedStats {
        self.stats
    }
}

impl MessageHandler for BookFeed {
    fn on_add_order(&mut self, msg: &AddOrder<'_>) {
        self.stats.messages += 1;

        if let Some(symbol) = &self.symbol {
            if !msg.symbol_matches(symbol) {
                return;
            }
        }
        // The parser rejects any other side byte as InvalidMessage.
        let Some(side) = Side::from_byte(msg.side_byte()) else {
            return;
        };

        let fills = &mut self.stats.fills;
        let accepted = self.book.add_order_with(
            msg.order_ref(),
            u64::from(msg.price()),
            msg.shares(),
            side,
            |exec| {
                *fills += 1;
                trace!(
                    maker = exec.maker_id,
                    taker = exec.taker_id,
                    price = exec.price,
                    qty = exec.qty,
                    "fill"
                );
            },
        );

        if accepted {
            self.stats.adds += 1;
        } else {
            self.stats.rejects += 1;
            warn!(
                order_ref = msg.order_ref(),
                symbol = msg.symbol_str(),
                "add order rejected (duplicate id or pool exhausted)"
            );
        }
    }

    fn on_order_executed(&mut self, msg: &OrderExecuted<'_>) {
        self.stats.messages += 1;
        if self.book.execute_order(msg.order_ref(), msg.executed_shares()) {
            self.stats.fills += 1;
        } else {
            // Normal under a symbol filter: the maker never rested here.
            trace!(order_ref = msg.order_ref(), "execution for unknown order");
        }
    }

    fn on_system_event(&mut self, header: &MessageHeader<'_>) {
        self.stats.messages += 1;
        debug!(ts_ns = header.timestamp_ns(), "system event");
    }

    fn on_unknown(&mut self, msg_type: u8, _payload: &[u8]) {
        self.stats.unknown += 1;
        debug!(msg_type, "unrecognized message type");
    }
}

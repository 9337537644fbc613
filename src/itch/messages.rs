//! Zero-copy ITCH 5.0 message views.
//!
//! Each view borrows a fixed-size prefix of the caller's buffer; fields are
//! decoded lazily on access from their documented offsets. Nothing here
//! copies payload bytes and nothing allocates. A view can only be built
//! from a buffer at least as long as the message, so field accessors are
//! total.

use crate::itch::endian::{be_u16, be_u32, be_u48, be_u64};

/// Wire length of the common message header.
pub const HEADER_SIZE: usize = 11;
/// Wire length of an Add Order ('A') message.
pub const ADD_ORDER_SIZE: usize = 36;
/// Wire length of an Order Executed ('E') message.
pub const ORDER_EXECUTED_SIZE: usize = 31;

/// ITCH 5.0 message type codes.
pub mod msg_type {
    pub const SYSTEM_EVENT: u8 = b'S';
    pub const STOCK_DIRECTORY: u8 = b'R';
    pub const STOCK_TRADING_ACTION: u8 = b'H';
    pub const REG_SHO_RESTRICTION: u8 = b'Y';
    pub const MARKET_PARTICIPANT_POSITION: u8 = b'L';
    pub const MWCB_DECLINE_LEVEL: u8 = b'V';
    pub const MWCB_STATUS: u8 = b'W';
    pub const IPO_QUOTING_PERIOD: u8 = b'K';
    pub const ADD_ORDER: u8 = b'A';
    pub const ADD_ORDER_MPID: u8 = b'F';
    pub const ORDER_EXECUTED: u8 = b'E';
    pub const ORDER_EXECUTED_WITH_PRICE: u8 = b'C';
    pub const ORDER_CANCEL: u8 = b'X';
    pub const ORDER_DELETE: u8 = b'D';
    pub const ORDER_REPLACE: u8 = b'U';
    pub const TRADE: u8 = b'P';
    pub const CROSS_TRADE: u8 = b'Q';
    pub const BROKEN_TRADE: u8 = b'B';
    pub const NOII: u8 = b'I';
    pub const RETAIL_INTEREST: u8 = b'N';
}

/// Total wire length of a message, by type code.
///
/// Returns `None` for codes that are not part of ITCH 5.0. The lengths are
/// the published protocol sizes; the stream parser relies on them to
/// advance across messages it does not decode.
pub fn message_size(msg_type: u8) -> Option<usize> {
    use self::msg_type::*;
    let size = match msg_type {
        SYSTEM_EVENT => 12,
        STOCK_DIRECTORY => 39,
        STOCK_TRADING_ACTION => 25,
        REG_SHO_RESTRICTION => 20,
        MARKET_PARTICIPANT_POSITION => 26,
        MWCB_DECLINE_LEVEL => 35,
        MWCB_STATUS => 12,
        IPO_QUOTING_PERIOD => 28,
        ADD_ORDER => ADD_ORDER_SIZE,
        ADD_ORDER_MPID => 40,
        ORDER_EXECUTED => ORDER_EXECUTED_SIZE,
        ORDER_EXECUTED_WITH_PRICE => 36,
        ORDER_CANCEL => 23,
        ORDER_DELETE => 19,
        ORDER_REPLACE => 35,
        TRADE => 44,
        CROSS_TRADE => 40,
        BROKEN_TRADE => 19,
        NOII => 50,
        RETAIL_INTEREST => 20,
        _ => return None,
    };
    Some(size)
}

/// Common 11-byte header present at offset 0 of every ITCH message.
///
/// Layout: type (1) | stock locate (2, BE) | tracking number (2, BE) |
/// timestamp (6, BE 48-bit nanoseconds since midnight).
#[derive(Clone, Copy)]
pub struct MessageHeader<'a> {
    raw: &'a [u8; HEADER_SIZE],
}

impl<'a> MessageHeader<'a> {
    /// Project a header view onto `buf`, or `None` if it is too short.
    pub fn from_bytes(buf: &'a [u8]) -> Option<Self> {
        let raw = buf.get(..HEADER_SIZE)?.try_into().ok()?;
        Some(Self { raw })
    }

    pub fn msg_type(&self) -> u8 {
        self.raw[0]
    }

    pub fn stock_locate(&self) -> u16 {
        be_u16(&self.raw[1..])
    }

    pub fn tracking_number(&self) -> u16 {
        be_u16(&self.raw[3..])
    }

    /// Nanoseconds since midnight. Wraps daily; no date is carried.
    pub fn timestamp_ns(&self) -> u64 {
        be_u48(&self.raw[5..])
    }
}

/// Add Order ('A') view, 36 bytes.
///
/// Header, then: order reference (8, BE) @11 | side byte @19 | shares
/// (4, BE) @20 | symbol (8 ASCII, right-padded 0x20) @24 | price (4, BE,
/// ticks = decimal × 10 000) @32.
#[derive(Clone, Copy)]
pub struct AddOrder<'a> {
    raw: &'a [u8; ADD_ORDER_SIZE],
}

impl<'a> AddOrder<'a> {
    /// Project an Add Order view onto `buf`, or `None` if it is too short.
    pub fn from_bytes(buf: &'a [u8]) -> Option<Self> {
        let raw = buf.get(..ADD_ORDER_SIZE)?.try_into().ok()?;
        Some(Self { raw })
    }

    pub fn stock_locate(&self) -> u16 {
        be_u16(&self.raw[1..])
    }

    pub fn tracking_number(&self) -> u16 {
        be_u16(&self.raw[3..])
    }

    pub fn timestamp_ns(&self) -> u64 {
        be_u48(&self.raw[5..])
    }

    /// Unique order reference number.
    pub fn order_ref(&self) -> u64 {
        be_u64(&self.raw[11..])
    }

    /// Raw side indicator byte: `b'B'` or `b'S'`.
    pub fn side_byte(&self) -> u8 {
        self.raw[19]
    }

    pub fn is_buy(&self) -> bool {
        self.side_byte() == b'B'
    }

    pub fn is_sell(&self) -> bool {
        self.side_byte() == b'S'
    }

    pub fn shares(&self) -> u32 {
        be_u32(&self.raw[20..])
    }

    /// The 8-byte symbol slot, space-padded on the right.
    pub fn symbol(&self) -> &'a [u8] {
        &self.raw[24..32]
    }

    /// Exact symbol match: `query` must cover the leading bytes and every
    /// remaining byte in the slot must be `0x20`.
    pub fn symbol_matches(&self, query: &str) -> bool {
        let q = query.as_bytes();
        if q.len() > 8 {
            return false;
        }
        let sym = self.symbol();
        sym[..q.len()] == *q && sym[q.len()..].iter().all(|&b| b == b' ')
    }

    /// Symbol with the space padding stripped, for display.
    pub fn symbol_str(&self) -> &'a str {
        let sym = self.symbol();
        let end = sym.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
        std::str::from_utf8(&sym[..end]).unwrap_or("")
    }

    /// Price in integer ticks (decimal price × 10 000).
    pub fn price(&self) -> u32 {
        be_u32(&self.raw[32..])
    }

    /// Price as a decimal number, for display only.
    pub fn price_f64(&self) -> f64 {
        f64::from(self.price()) / 10_000.0
    }
}

/// Order Executed ('E') view, 31 bytes.
///
/// Header, then: order reference (8, BE) @11 | executed shares (4, BE) @19
/// | match number (8, BE) @23.
#[derive(Clone, Copy)]
pub struct OrderExecuted<'a> {
    raw: &'a [u8; ORDER_EXECUTED_SIZE],
}

impl<'a> OrderExecuted<'a> {
    /// Project an Order Executed view onto `buf`, or `None` if too short.
    pub fn from_bytes(buf: &'a [u8]) -> Option<Self> {
        let raw = buf.get(..ORDER_EXECUTED_SIZE)?.try_into().ok()?;
        Some(Self { raw })
    }

    pub fn stock_locate(&self) -> u16 {
        be_u16(&self.raw[1..])
    }

    pub fn tracking_number(&self) -> u16 {
        be_u16(&self.raw[3..])
    }

    pub fn timestamp_ns(&self) -> u64 {
        be_u48(&self.raw[5..])
    }

    /// Reference of the resting order being executed.
    pub fn order_ref(&self) -> u64 {
        be_u64(&self.raw[11..])
    }

    pub fn executed_shares(&self) -> u32 {
        be_u32(&self.raw[19..])
    }

    pub fn match_number(&self) -> u64 {
        be_u64(&self.raw[23..])
    }
}

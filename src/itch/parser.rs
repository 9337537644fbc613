//! ITCH message decoder and stream dispatcher.
//!
//! The dispatcher validates length, classifies the type byte, projects the
//! matching zero-copy view, and hands it to a [`MessageHandler`]. It holds
//! no state and performs no allocation; decoded views alias the input
//! buffer.

use crate::itch::handler::MessageHandler;
use crate::itch::messages::{self, msg_type, AddOrder, MessageHeader, OrderExecuted};

/// Outcome of decoding a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseResult {
    /// The message was decoded and dispatched.
    Ok,
    /// The buffer is shorter than the message; no handler was invoked.
    /// The caller should top up the buffer and retry.
    BufferTooSmall,
    /// The type byte is not an ITCH 5.0 code; the raw bytes were delivered
    /// to [`MessageHandler::on_unknown`].
    UnknownType,
    /// The length checked out but the content is malformed (for example an
    /// Add Order side byte other than `'B'`/`'S'`); no handler was invoked.
    InvalidMessage,
}

/// Decode the single message at the start of `buf`.
///
/// Typed views are dispatched for `'A'`, `'E'` and `'S'`; other recognized
/// codes are length-validated and accepted without a callback so the
/// stream can advance past them.
pub fn parse_one<H: MessageHandler>(buf: &[u8], handler: &mut H) -> ParseResult {
    let Some(&type_byte) = buf.first() else {
        return ParseResult::BufferTooSmall;
    };

    let Some(size) = messages::message_size(type_byte) else {
        handler.on_unknown(type_byte, buf);
        return ParseResult::UnknownType;
    };

    if buf.len() < size {
        return ParseResult::BufferTooSmall;
    }

    match type_byte {
        msg_type::ADD_ORDER => match AddOrder::from_bytes(buf) {
            Some(msg) if msg.is_buy() || msg.is_sell() => {
                handler.on_add_order(&msg);
                ParseResult::Ok
            }
            Some(_) => ParseResult::InvalidMessage,
            None => ParseResult::BufferTooSmall,
        },
        msg_type::ORDER_EXECUTED => match OrderExecuted::from_bytes(buf) {
            Some(msg) => {
                handler.on_order_executed(&msg);
                ParseResult::Ok
            }
            None => ParseResult::BufferTooSmall,
        },
        msg_type::SYSTEM_EVENT => match MessageHeader::from_bytes(buf) {
            Some(header) => {
                handler.on_system_event(&header);
                ParseResult::Ok
            }
            None => ParseResult::BufferTooSmall,
        },
        _ => ParseResult::Ok,
    }
}

/// Decode consecutive messages from `buf`, returning the bytes consumed.
///
/// Stops at the first non-[`ParseResult::Ok`] outcome. A trailing
/// incomplete message is not an error; the caller tops up the buffer and
/// resumes from the returned offset.
pub fn parse_stream<H: MessageHandler>(buf: &[u8], handler: &mut H) -> usize {
    let mut consumed = 0;
    while consumed < buf.len() {
        let rest = &buf[consumed..];
        if parse_one(rest, handler) != ParseResult::Ok {
            break;
        }
        match messages::message_size(rest[0]) {
            Some(size) => consumed += size,
            // Unreachable: Ok implies a recognized type with a known size.
            None => break,
        }
    }
    consumed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct CountingHandler {
        add_orders: usize,
        executions: usize,
        system_events: usize,
        unknown: usize,
        last_unknown_type: u8,
    }

    impl MessageHandler for CountingHandler {
        fn on_add_order(&mut self, _msg: &AddOrder<'_>) {
            self.add_orders += 1;
        }
        fn on_order_executed(&mut self, _msg: &OrderExecuted<'_>) {
            self.executions += 1;
        }
        fn on_system_event(&mut self, _header: &MessageHeader<'_>) {
            self.system_events += 1;
        }
        fn on_unknown(&mut self, msg_type: u8, _payload: &[u8]) {
            self.unknown += 1;
            self.last_unknown_type = msg_type;
        }
    }

    #[derive(Default)]
    struct CapturingHandler {
        order_refs: Vec<u64>,
        shares: Vec<u32>,
    }

    impl MessageHandler for CapturingHandler {
        fn on_add_order(&mut self, msg: &AddOrder<'_>) {
            self.order_refs.push(msg.order_ref());
            self.shares.push(msg.shares());
        }
        fn on_order_executed(&mut self, msg: &OrderExecuted<'_>) {
            self.order_refs.push(msg.order_ref());
        }
    }

    fn add_order_msg(order_ref: u64, side: u8, shares: u32, price: u32) -> [u8; 36] {
        let mut buf = [0u8; 36];
        buf[0] = b'A';
        buf[1..3].copy_from_slice(&1u16.to_be_bytes());
        buf[3..5].copy_from_slice(&2u16.to_be_bytes());
        buf[5..11].copy_from_slice(&1_000_000_000u64.to_be_bytes()[2..]);
        buf[11..19].copy_from_slice(&order_ref.to_be_bytes());
        buf[19] = side;
        buf[20..24].copy_from_slice(&shares.to_be_bytes());
        buf[24..32].copy_from_slice(b"AAPL    ");
        buf[32..36].copy_from_slice(&price.to_be_bytes());
        buf
    }

    fn order_executed_msg(order_ref: u64, executed: u32, match_number: u64) -> [u8; 31] {
        let mut buf = [0u8; 31];
        buf[0] = b'E';
        buf[1..3].copy_from_slice(&1u16.to_be_bytes());
        buf[3..5].copy_from_slice(&3u16.to_be_bytes());
        buf[5..11].copy_from_slice(&1_000_000_001u64.to_be_bytes()[2..]);
        buf[11..19].copy_from_slice(&order_ref.to_be_bytes());
        buf[19..23].copy_from_slice(&executed.to_be_bytes());
        buf[23..31].copy_from_slice(&match_number.to_be_bytes());
        buf
    }

    #[test]
    fn test_parse_add_order() {
        let buf = add_order_msg(1_234_567_890, b'B', 500, 1_000_000);

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&buf, &mut handler), ParseResult::Ok);
        assert_eq!(handler.add_orders, 1);
        assert_eq!(handler.executions, 0);
        assert_eq!(handler.unknown, 0);
    }

    #[test]
    fn test_parse_order_executed() {
        let buf = order_executed_msg(9_876_543_210, 200, 77);

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&buf, &mut handler), ParseResult::Ok);
        assert_eq!(handler.add_orders, 0);
        assert_eq!(handler.executions, 1);
    }

    #[test]
    fn test_parse_system_event() {
        let buf = [b'S', 0, 1, 0, 2, 0, 0, 0, 0, 0, 0, b'O'];

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&buf, &mut handler), ParseResult::Ok);
        assert_eq!(handler.system_events, 1);
    }

    #[test]
    fn test_buffer_too_small() {
        let buf = add_order_msg(1, b'B', 100, 1_000_000);

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&buf[..5], &mut handler), ParseResult::BufferTooSmall);
        assert_eq!(parse_one(&[], &mut handler), ParseResult::BufferTooSmall);
        assert_eq!(handler.add_orders, 0);
    }

    #[test]
    fn test_unknown_type_dispatches_raw_bytes() {
        let buf = [b'Z', 0, 1, 0, 2, 0, 0, 0, 0, 0, 0];

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&buf, &mut handler), ParseResult::UnknownType);
        assert_eq!(handler.unknown, 1);
        assert_eq!(handler.last_unknown_type, b'Z');
    }

    #[test]
    fn test_invalid_side_byte() {
        let buf = add_order_msg(1, b'X', 100, 1_000_000);

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&buf, &mut handler), ParseResult::InvalidMessage);
        assert_eq!(handler.add_orders, 0);
    }

    #[test]
    fn test_recognized_untyped_code_is_accepted() {
        // Order Delete is 19 bytes; recognized but carries no typed view.
        let buf = [0u8; 19];
        let mut msg = buf;
        msg[0] = b'D';

        let mut handler = CountingHandler::default();
        assert_eq!(parse_one(&msg, &mut handler), ParseResult::Ok);
        assert_eq!(handler.add_orders + handler.executions + handler.unknown, 0);
    }

    #[test]
    fn test_stream_single_message_consumes_its_exact_length() {
        let buf = add_order_msg(1_234_567_890, b'B', 500, 1_000_000);
        let mut handler = CountingHandler::default();
        assert_eq!(parse_stream(&buf, &mut handler), 36);
        assert_eq!(handler.add_orders, 1);
    }

    #[test]
    fn test_stream_multiple_messages() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&add_order_msg(1_234_567_890, b'B', 500, 1_000_000));
        buf.extend_from_slice(&add_order_msg(9_876_543_210, b'S', 1_000, 2_000_000));

        let mut handler = CapturingHandler::default();
        assert_eq!(parse_stream(&buf, &mut handler), 72);
        assert_eq!(handler.order_refs, vec![1_234_567_890, 9_876_543_210]);
        assert_eq!(handler.shares, vec![500, 1_000]);
    }

    #[test]
    fn test_stream_mixed_types() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&add_order_msg(1, b'B', 500, 1_000_000));
        buf.extend_from_slice(&order_executed_msg(1, 100, 1));

        let mut handler = CountingHandler::default();
        assert_eq!(parse_stream(&buf, &mut handler), 67);
        assert_eq!(handler.add_orders, 1);
        assert_eq!(handler.executions, 1);
    }

    #[test]
    fn test_stream_stops_at_incomplete_trailing_message() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&add_order_msg(1, b'B', 500, 1_000_000));
        buf.extend_from_slice(&[b'A', 0x00, 0x01]); // truncated second message

        let mut handler = CountingHandler::default();
        assert_eq!(parse_stream(&buf, &mut handler), 36);
        assert_eq!(handler.add_orders, 1);
    }

    #[test]
    fn test_stream_stops_at_unknown_type() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&add_order_msg(1, b'B', 500, 1_000_000));
        buf.push(b'Z');
        buf.extend_from_slice(&add_order_msg(2, b'S', 100, 1_000_000));

        let mut handler = CountingHandler::default();
        assert_eq!(parse_stream(&buf, &mut handler), 36);
        assert_eq!(handler.add_orders, 1);
        assert_eq!(handler.unknown, 1);
    }

    proptest! {
        #[test]
        fn parse_stream_never_panics_or_overconsumes(
            payload in proptest::collection::vec(any::<u8>(), 0..4096)
        ) {
            let mut handler = CountingHandler::default();
            let consumed = parse_stream(&payload, &mut handler);
            prop_assert!(consumed <= payload.len());
        }
    }
}

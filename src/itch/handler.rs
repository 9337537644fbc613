//! Handler contract between the decoder and its consumer.

use crate::itch::messages::{AddOrder, MessageHeader, OrderExecuted};

/// Receives decoded messages from the parser.
///
/// Every method has a default no-op body, so a consumer overrides only the
/// messages it cares about. Dispatch is monomorphized (the parser is
/// generic over the handler type); there is no virtual call on the decode
/// path. The views passed in borrow the parser's input buffer and are valid
/// only for the duration of the call.
pub trait MessageHandler {
    /// An Add Order ('A') message.
    fn on_add_order(&mut self, _msg: &AddOrder<'_>) {}

    /// An Order Executed ('E') message.
    fn on_order_executed(&mut self, _msg: &OrderExecuted<'_>) {}

    /// A System Event ('S') message, delivered as its header.
    fn on_system_event(&mut self, _header: &MessageHeader<'_>) {}

    /// A message whose type byte is not an ITCH 5.0 code. `payload` is the
    /// raw remainder of the input buffer, starting at the type byte.
    fn on_unknown(&mut self, _msg_type: u8, _payload: &[u8]) {}
}

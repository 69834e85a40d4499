//! Helpers for receiving webhook deliveries: signature validation and event
//! parsing. None of these perform I/O.

mod event;
mod signature;

pub use event::{
    AccountData, NativeTransfer, RawTokenAmount, TokenBalanceChange, TokenTransfer, WebhookEvent,
    parse_event, parse_events,
};
pub use signature::{SIGNATURE_HEADER, compute_signature, validate_signature};

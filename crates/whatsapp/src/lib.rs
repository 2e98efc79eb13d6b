//! WhatsApp Cloud API channel for sevsbot.
//!
//! Decodes inbound webhook deliveries, answers the subscription handshake,
//! and sends text replies through the Graph API.

pub mod error;
pub mod inbound;
pub mod outbound;
pub mod verify;

pub use {
    error::{Error, Result},
    inbound::{InboundMessage, parse_inbound},
    outbound::WhatsAppOutbound,
    verify::verify_subscription,
};

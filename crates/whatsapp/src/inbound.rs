//! Decoding of WhatsApp Cloud API webhook deliveries.
//!
//! Deliveries nest the interesting part four levels deep
//! (`entry[0].changes[0].value.messages[0]`), and senders do not always
//! honor the conventional shape. A strict typed parse is tried first; on
//! any structural mismatch the same path is probed field by field over the
//! raw value. Anything still missing means there is nothing to handle, not
//! a protocol error.

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

/// A user text message lifted out of a webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub sender_id: String,
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<WebhookEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookEntry {
    #[serde(default)]
    changes: Vec<WebhookChange>,
}

#[derive(Debug, Default, Deserialize)]
struct WebhookChange {
    #[serde(default)]
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<RawMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMessage {
    from: Option<String>,
    text: Option<TextContent>,
    interactive: Option<InteractiveContent>,
}

#[derive(Debug, Default, Deserialize)]
struct TextContent {
    body: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InteractiveContent {
    nfm_reply: Option<NfmReply>,
}

#[derive(Debug, Default, Deserialize)]
struct NfmReply {
    response_json: Option<String>,
}

fn extract_change_value(raw: &serde_json::Value) -> ChangeValue {
    match serde_json::from_value::<WebhookPayload>(raw.clone()) {
        Ok(payload) => payload
            .entry
            .into_iter()
            .next()
            .and_then(|entry| entry.changes.into_iter().next())
            .map(|change| change.value)
            .unwrap_or_default(),
        Err(err) => {
            debug!(%err, "delivery off the conventional shape, probing loosely");
            raw.get("entry")
                .and_then(|entry| entry.get(0))
                .and_then(|entry| entry.get("changes"))
                .and_then(|changes| changes.get(0))
                .and_then(|change| change.get("value"))
                .cloned()
                .map(|value| serde_json::from_value(value).unwrap_or_default())
                .unwrap_or_default()
        }
    }
}

/// Pull the first user message out of a webhook delivery.
///
/// Returns `Ok(None)` when the payload carries no messages or no usable
/// text. A message with text but no sender id is [`Error::MissingSender`].
pub fn parse_inbound(raw: &serde_json::Value) -> Result<Option<InboundMessage>> {
    let Some(message) = extract_change_value(raw).messages.into_iter().next() else {
        return Ok(None);
    };

    // Flow replies arrive under interactive.nfm_reply instead of text.body;
    // an empty body also defers to the flow reply.
    let text = message
        .text
        .and_then(|text| text.body)
        .filter(|body| !body.is_empty())
        .or_else(|| {
            message
                .interactive
                .and_then(|interactive| interactive.nfm_reply)
                .and_then(|reply| reply.response_json)
        })
        .filter(|text| !text.is_empty());

    let Some(text) = text else {
        return Ok(None);
    };

    let sender_id = message.from.ok_or(Error::MissingSender)?;
    Ok(Some(InboundMessage { sender_id, text }))
}

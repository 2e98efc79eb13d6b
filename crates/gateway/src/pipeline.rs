//! End-to-end handling of one inbound message.
//!
//! Extraction, lookup, composition, send: each stage either advances or
//! degrades the request on its own terms. Nothing here can fail the webhook
//! acknowledgement.

use tracing::{debug, error, warn};

use {sevsbot_lookup::compose_reply, sevsbot_oracle::Extraction, sevsbot_whatsapp::InboundMessage};

use crate::server::AppState;

/// Run one message through extract, query, compose, and send.
///
/// Extraction failures end the request silently (logged at error). Lookup
/// failures degrade into an apology naming the underlying error. Send
/// failures are logged and swallowed.
pub async fn handle_message(state: &AppState, message: &InboundMessage) {
    let reply = match state.oracle.extract(&message.text).await {
        Ok(Extraction::Lookup(query)) => {
            debug!(query_type = ?query.query_type, "extracted lookup intent");
            match state.lookup.query(&query).await {
                Ok(envelope) => {
                    debug!(ok = envelope.ok, rows = envelope.data.len(), "lookup returned");
                    compose_reply(&envelope)
                }
                Err(err) => {
                    warn!(%err, "SEVS lookup failed");
                    format!("I couldn't reach the SEVS service. {err}")
                }
            }
        }
        Ok(Extraction::DirectAnswer(text)) => {
            debug!("oracle answered without a lookup");
            text
        }
        Err(err) => {
            error!(%err, "intent extraction failed");
            return;
        }
    };

    debug!(chars = reply.len(), "composed reply");
    if let Err(err) = state.outbound.send_text(&message.sender_id, &reply).await {
        warn!(to = %message.sender_id, %err, "reply send failed");
    }
}

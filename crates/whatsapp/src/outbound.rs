//! Sending text replies through the Graph API.

use std::sync::LazyLock;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use tracing::debug;

use crate::error::{Error, Result};

/// Upper bound on a single Graph API round trip.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
    &CLIENT
}

/// Outbound sender for WhatsApp text messages.
pub struct WhatsAppOutbound {
    graph_base_url: String,
    access_token: Secret<String>,
    client: &'static reqwest::Client,
}

impl WhatsAppOutbound {
    #[must_use]
    pub fn new(graph_base_url: String, access_token: Secret<String>) -> Self {
        Self {
            graph_base_url,
            access_token,
            client: shared_http_client(),
        }
    }

    /// Send a plain text message to one recipient, link previews off.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let url = format!("{}/me/messages", self.graph_base_url.trim_end_matches('/'));
        let payload = serde_json::json!({
            "messaging_product": "whatsapp",
            "to": to,
            "type": "text",
            "text": { "preview_url": false, "body": body },
        });

        debug!(to, chars = body.len(), "sending WhatsApp text");

        let resp = self
            .client
            .post(url)
            .timeout(SEND_TIMEOUT)
            .bearer_auth(self.access_token.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }
        debug!(to, "WhatsApp send accepted");
        Ok(())
    }
}

//! HTTP client for the SEVS eligibility query backend.

use std::sync::LazyLock;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;
use tracing::debug;

use crate::types::{EligibilityQuery, QueryResultEnvelope};

/// Upper bound on a single backend round trip.
const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
    &CLIENT
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("SEVS backend returned HTTP {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("SEVS backend response was not a result envelope: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Client for the eligibility endpoint. The whole structured query is sent
/// as the POST body; the service key travels in both the `apikey` header
/// and a bearer token.
pub struct LookupClient {
    endpoint: String,
    api_key: Secret<String>,
    client: &'static reqwest::Client,
}

impl LookupClient {
    #[must_use]
    pub fn new(endpoint: String, api_key: Secret<String>) -> Self {
        Self {
            endpoint,
            api_key,
            client: shared_http_client(),
        }
    }

    /// Execute a structured eligibility query and decode the result envelope.
    pub async fn query(&self, query: &EligibilityQuery) -> Result<QueryResultEnvelope> {
        debug!(query_type = ?query.query_type, "dispatching SEVS lookup");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(QUERY_TIMEOUT)
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status { status, body });
        }

        let body = response.text().await?;
        let envelope: QueryResultEnvelope = serde_json::from_str(&body)?;
        debug!(ok = envelope.ok, rows = envelope.data.len(), "SEVS lookup completed");
        Ok(envelope)
    }
}

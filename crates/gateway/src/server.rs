//! HTTP surface: webhook verification, inbound deliveries, health.

use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        extract::{Query, State},
        response::{IntoResponse, Json},
        routing::get,
    },
    serde::Deserialize,
    tracing::{debug, info, warn},
};

use {
    sevsbot_config::Config,
    sevsbot_lookup::LookupClient,
    sevsbot_oracle::OracleClient,
    sevsbot_whatsapp::{WhatsAppOutbound, parse_inbound, verify_subscription},
};

use crate::pipeline;

// ── Shared app state ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub oracle: Arc<OracleClient>,
    pub lookup: Arc<LookupClient>,
    pub outbound: Arc<WhatsAppOutbound>,
}

impl AppState {
    /// Wire the full client set from configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        let oracle = OracleClient::new(
            config.openai_api_key.clone(),
            config.oracle_model.clone(),
            config.openai_base_url.clone(),
        );
        let lookup = LookupClient::new(config.supabase_url.clone(), config.supabase_key.clone());
        let outbound =
            WhatsAppOutbound::new(config.graph_base_url.clone(), config.whatsapp_token.clone());

        Self {
            config: Arc::new(config),
            oracle: Arc::new(oracle),
            lookup: Arc::new(lookup),
            outbound: Arc::new(outbound),
        }
    }
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", get(verify_handler).post(inbound_handler))
        .with_state(state)
}

/// Start the HTTP server and run until it fails or is shut down.
pub async fn serve(bind: &str, port: u16, state: AppState) -> anyhow::Result<()> {
    let app = build_app(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    mode: Option<String>,
    challenge: Option<String>,
    token: Option<String>,
}

async fn verify_handler(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    match verify_subscription(
        params.mode.as_deref(),
        params.token.as_deref(),
        params.challenge.as_deref(),
        &state.config.verify_token,
    ) {
        Some(body) => {
            debug!("webhook verification accepted");
            body.into_response()
        }
        None => {
            warn!("webhook verification refused");
            "forbidden".into_response()
        }
    }
}

/// Inbound deliveries are acknowledged unconditionally; whatever happens to
/// the message afterwards is this service's problem, not the caller's.
async fn inbound_handler(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    match parse_inbound(&payload) {
        Ok(Some(message)) => {
            debug!(from = %message.sender_id, "inbound message accepted");
            // Spawned so a dropped connection cannot cancel the unit
            // mid-flight; the ack still waits for it to finish.
            let unit =
                tokio::spawn(async move { pipeline::handle_message(&state, &message).await });
            if let Err(err) = unit.await {
                warn!(%err, "message unit crashed");
            }
        }
        Ok(None) => debug!("delivery carried no actionable message"),
        Err(err) => warn!(%err, "delivery was malformed"),
    }

    Json(serde_json::json!({ "ok": true }))
}

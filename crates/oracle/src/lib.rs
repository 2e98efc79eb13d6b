//! Intent extraction through an OpenAI-compatible chat-completions endpoint.
//!
//! One user message goes in; either a structured [`EligibilityQuery`] or a
//! direct textual answer comes out. The model decides which by calling (or
//! not calling) the single advertised lookup tool.

pub mod tool;

use std::sync::LazyLock;
use std::time::Duration;

use secrecy::{ExposeSecret, Secret};
use tracing::{debug, trace};

use sevsbot_lookup::EligibilityQuery;

use crate::tool::eligibility_lookup_tool;

const SYSTEM_PROMPT: &str = "You are an Australian SEVS eligibility assistant. Be concise and \
    precise. Call the sevsEligibilityLookup tool for eligibility/expiring/model report \
    questions. Extract make, model, variant, model_code, build_date/year/month, \
    window_days/months. Explain the verdict and why using the tool JSON; ask for variant/model \
    code if ambiguous.";

/// Sent back when the model neither calls the tool nor produces text.
const CLARIFICATION_PROMPT: &str =
    "Tell me the make/model/variant or model code, and build year/month.";

/// Upper bound on a single extraction round trip.
const EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

fn shared_http_client() -> &'static reqwest::Client {
    static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
    &CLIENT
}

/// Outcome of one extraction round.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The model requested a structured lookup.
    Lookup(EligibilityQuery),
    /// The model answered (or asked for clarification) in plain text.
    DirectAnswer(String),
}

pub struct OracleClient {
    api_key: Secret<String>,
    model: String,
    base_url: String,
    client: &'static reqwest::Client,
}

impl OracleClient {
    #[must_use]
    pub fn new(api_key: Secret<String>, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: shared_http_client(),
        }
    }

    /// Run one extraction round over the user's message.
    ///
    /// A tool call with arguments that do not decode into a valid query is an
    /// error rather than a guess; the caller owns the user-facing apology.
    pub async fn extract(&self, text: &str) -> anyhow::Result<Extraction> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": text},
            ],
            "tools": [eligibility_lookup_tool()],
            "tool_choice": "auto",
        });

        debug!(model = %self.model, "oracle extract request");
        trace!(body = %serde_json::to_string(&body).unwrap_or_default(), "oracle request body");

        let http_resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .timeout(EXTRACT_TIMEOUT)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_resp.status();
        if !status.is_success() {
            let body_text = http_resp.text().await.unwrap_or_default();
            anyhow::bail!("oracle API error HTTP {status}: {body_text}");
        }

        let resp = http_resp.json::<serde_json::Value>().await?;
        trace!(response = %resp, "oracle raw response");

        let message = &resp["choices"][0]["message"];
        if let Some(call) = message["tool_calls"]
            .as_array()
            .and_then(|calls| calls.first())
        {
            let arguments = call["function"]["arguments"].as_str().unwrap_or_default();
            let query: EligibilityQuery = serde_json::from_str(arguments).map_err(|err| {
                anyhow::anyhow!("oracle tool arguments were not a valid query: {err}")
            })?;
            if let Some(month) = query.build_month {
                anyhow::ensure!(
                    (1..=12).contains(&month),
                    "oracle produced build_month {month} outside 1..=12"
                );
            }
            debug!(query_type = ?query.query_type, "oracle requested a lookup");
            return Ok(Extraction::Lookup(query));
        }

        let content = message["content"]
            .as_str()
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .unwrap_or(CLARIFICATION_PROMPT);
        debug!("oracle answered directly");
        Ok(Extraction::DirectAnswer(content.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, extract::Request, routing::post};

    use sevsbot_lookup::QueryType;

    use super::*;

    #[derive(Default, Clone)]
    struct CapturedRequest {
        body: Option<serde_json::Value>,
    }

    /// Start a mock chat-completions server that captures the request body
    /// and returns the given JSON payload verbatim.
    async fn start_chat_mock(payload: String) -> (String, Arc<Mutex<Vec<CapturedRequest>>>) {
        let captured: Arc<Mutex<Vec<CapturedRequest>>> = Arc::new(Mutex::new(Vec::new()));
        let captured_clone = captured.clone();

        let app = Router::new().route(
            "/chat/completions",
            post(move |req: Request| {
                let cap = captured_clone.clone();
                let payload = payload.clone();
                async move {
                    let body_bytes = axum::body::to_bytes(req.into_body(), 1024 * 1024)
                        .await
                        .unwrap_or_default();
                    let body: Option<serde_json::Value> = serde_json::from_slice(&body_bytes).ok();
                    cap.lock().unwrap().push(CapturedRequest { body });

                    axum::response::Response::builder()
                        .header("content-type", "application/json")
                        .body(axum::body::Body::from(payload))
                        .unwrap()
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), captured)
    }

    fn test_client(base_url: &str) -> OracleClient {
        OracleClient::new(
            Secret::new("test-key".to_string()),
            "gpt-5-chat".to_string(),
            base_url.to_string(),
        )
    }

    fn tool_call_payload(arguments: &str) -> String {
        serde_json::json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": tool::LOOKUP_TOOL_NAME,
                            "arguments": arguments,
                        }
                    }]
                }
            }]
        })
        .to_string()
    }

    fn content_payload(content: serde_json::Value) -> String {
        serde_json::json!({
            "choices": [{ "message": { "content": content } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn request_carries_system_prompt_tool_and_auto_choice() {
        let (base_url, captured) =
            start_chat_mock(content_payload(serde_json::json!("hello"))).await;

        test_client(&base_url).extract("hi").await.unwrap();

        let requests = captured.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let body = requests[0].body.as_ref().unwrap();

        assert_eq!(body["model"], "gpt-5-chat");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"].as_array().unwrap().len(), 1);
        assert_eq!(body["tools"][0]["function"]["name"], tool::LOOKUP_TOOL_NAME);
    }

    #[tokio::test]
    async fn tool_call_arguments_become_a_structured_query() {
        let (base_url, _captured) = start_chat_mock(tool_call_payload(
            r#"{"query_type": "vehicle_eligibility", "make": "Nissan", "model": "Skyline", "build_year": 1999}"#,
        ))
        .await;

        let extraction = test_client(&base_url).extract("is a skyline ok").await.unwrap();

        match extraction {
            Extraction::Lookup(query) => {
                assert_eq!(query.query_type, QueryType::VehicleEligibility);
                assert_eq!(query.make.as_deref(), Some("Nissan"));
                assert_eq!(query.build_year, Some(1999));
                assert_eq!(query.limit, 20);
            }
            Extraction::DirectAnswer(text) => panic!("expected lookup, got answer: {text}"),
        }
    }

    #[tokio::test]
    async fn plain_content_becomes_a_direct_answer() {
        let (base_url, _captured) = start_chat_mock(content_payload(serde_json::json!(
            "Which variant do you mean?"
        )))
        .await;

        let extraction = test_client(&base_url).extract("skyline?").await.unwrap();

        assert_eq!(
            extraction,
            Extraction::DirectAnswer("Which variant do you mean?".to_string())
        );
    }

    #[tokio::test]
    async fn empty_content_falls_back_to_the_clarification_prompt() {
        let (base_url, _captured) =
            start_chat_mock(content_payload(serde_json::Value::Null)).await;

        let extraction = test_client(&base_url).extract("hmm").await.unwrap();

        assert_eq!(
            extraction,
            Extraction::DirectAnswer(CLARIFICATION_PROMPT.to_string())
        );
    }

    #[tokio::test]
    async fn malformed_tool_arguments_are_an_error() {
        let (base_url, _captured) =
            start_chat_mock(tool_call_payload(r#"{"make": "Nissan"#)).await;

        let err = test_client(&base_url).extract("skyline").await.unwrap_err();

        assert!(
            err.to_string().contains("not a valid query"),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn missing_query_type_in_arguments_is_an_error() {
        let (base_url, _captured) =
            start_chat_mock(tool_call_payload(r#"{"make": "Nissan"}"#)).await;

        let err = test_client(&base_url).extract("skyline").await.unwrap_err();

        assert!(err.to_string().contains("not a valid query"));
    }

    #[tokio::test]
    async fn out_of_range_build_month_is_an_error() {
        let (base_url, _captured) = start_chat_mock(tool_call_payload(
            r#"{"query_type": "vehicle_eligibility", "build_month": 13}"#,
        ))
        .await;

        let err = test_client(&base_url).extract("skyline").await.unwrap_err();

        assert!(err.to_string().contains("build_month"));
    }

    #[tokio::test]
    async fn api_error_status_surfaces_status_and_body() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async {
                axum::response::Response::builder()
                    .status(500)
                    .body(axum::body::Body::from("boom"))
                    .unwrap()
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let err = test_client(&format!("http://{addr}"))
            .extract("skyline")
            .await
            .unwrap_err();

        let text = err.to_string();
        assert!(text.contains("500"), "missing status: {text}");
        assert!(text.contains("boom"), "missing body: {text}");
    }
}

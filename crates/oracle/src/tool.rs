//! Tool definition advertised to the chat-completions endpoint.

use serde::Serialize;

/// Tool name the model must call to request a structured lookup.
pub const LOOKUP_TOOL_NAME: &str = "sevsEligibilityLookup";

#[derive(Debug, Serialize)]
pub struct ChatCompletionsTool {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: ChatCompletionsFunction,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionsFunction {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: serde_json::Value,
}

/// The single tool exposed to the model. The parameter schema mirrors
/// the structured query the SEVS backend accepts.
#[must_use]
pub fn eligibility_lookup_tool() -> ChatCompletionsTool {
    ChatCompletionsTool {
        tool_type: "function",
        function: ChatCompletionsFunction {
            name: LOOKUP_TOOL_NAME,
            description: "Query SEVS eligibility, expiry windows, and model-report status.",
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "query_type": {
                        "type": "string",
                        "enum": ["vehicle_eligibility", "expiring_soon", "model_report_status"]
                    },
                    "make": {"type": "string"},
                    "model": {"type": "string"},
                    "variant": {"type": "string"},
                    "model_code": {"type": "string"},
                    "build_date": {"type": "string"},
                    "build_year": {"type": "integer"},
                    "build_month": {"type": "integer", "minimum": 1, "maximum": 12},
                    "window_days": {"type": "integer"},
                    "window_months": {"type": "integer"},
                    "limit": {"type": "integer", "default": 20},
                    "cursor": {"type": "string"}
                },
                "required": ["query_type"]
            }),
        },
    }
}

//! Webhook subscription verification handshake.
//!
//! The platform probes the webhook with a GET request carrying `mode`,
//! `token`, and `challenge` query parameters; a correct answer echoes the
//! challenge back in the response body.

/// Check a subscription request and produce the body to echo back.
///
/// Returns `Some(body)` when the mode is `subscribe` and the token matches,
/// `None` otherwise. A purely numeric challenge is echoed in canonical
/// decimal form (no leading zeros); anything else is echoed verbatim. A
/// matching request without a challenge gets an empty body.
#[must_use]
pub fn verify_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    verify_token: &str,
) -> Option<String> {
    let mode = mode?;
    let token = token?;

    if mode == "subscribe" && token == verify_token {
        Some(challenge.map(canonicalize_challenge).unwrap_or_default())
    } else {
        None
    }
}

// Values too large for u64 are echoed untouched.
fn canonicalize_challenge(challenge: &str) -> String {
    if !challenge.is_empty() && challenge.bytes().all(|byte| byte.is_ascii_digit()) {
        if let Ok(value) = challenge.parse::<u64>() {
            return value.to_string();
        }
    }
    challenge.to_string()
}

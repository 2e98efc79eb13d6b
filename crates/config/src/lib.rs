//! Process configuration, read from the environment once at startup.
//!
//! Every component receives the resulting [`Config`] by reference; nothing
//! reads the environment after process entry.

use {secrecy::Secret, thiserror::Error};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_ORACLE_MODEL: &str = "gpt-5-chat";
const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com/v20.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("PORT value {value:?} is not a valid port number")]
    InvalidPort { value: String },
}

/// Immutable process-wide configuration.
///
/// Credentials stay wrapped in [`Secret`] and are exposed only at the call
/// sites that build request headers.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the chat-completions oracle.
    pub openai_api_key: Secret<String>,
    /// Base URL of the chat-completions API.
    pub openai_base_url: String,
    /// Model named in extraction requests.
    pub oracle_model: String,
    /// SEVS backend query endpoint.
    pub supabase_url: String,
    /// Static API key for the SEVS backend.
    pub supabase_key: Secret<String>,
    /// WhatsApp Business access token.
    pub whatsapp_token: Secret<String>,
    /// Base URL of the Graph API send endpoint.
    pub graph_base_url: String,
    /// Token webhook subscription requests must present.
    pub verify_token: String,
    /// Port the webhook server listens on.
    pub port: u16,
}

impl Config {
    /// Read configuration from the process environment.
    ///
    /// `OPENAI_API_KEY`, `SUPABASE_URL`, `SUPABASE_KEY`, `WHATSAPP_TOKEN` and
    /// `VERIFY_TOKEN` are required; empty values count as missing. `PORT`
    /// defaults to 8000, the base URLs and model to their hosted defaults.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let require = |key: &'static str| value(key).ok_or(Error::MissingVar(key));

        let port = match value("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            openai_api_key: Secret::new(require("OPENAI_API_KEY")?),
            openai_base_url: value("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            oracle_model: value("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_ORACLE_MODEL.into()),
            supabase_url: require("SUPABASE_URL")?,
            supabase_key: Secret::new(require("SUPABASE_KEY")?),
            whatsapp_token: Secret::new(require("WHATSAPP_TOKEN")?),
            graph_base_url: value("GRAPH_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.into()),
            verify_token: require("VERIFY_TOKEN")?,
            port,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn full_env() -> HashMap<String, String> {
        [
            ("OPENAI_API_KEY", "sk-test"),
            ("SUPABASE_URL", "https://backend.example/rpc/sevs"),
            ("SUPABASE_KEY", "service-key"),
            ("WHATSAPP_TOKEN", "wa-token"),
            ("VERIFY_TOKEN", "verify-me"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Config, Error> {
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn loads_required_values_and_defaults() {
        let config = from_map(&full_env()).unwrap();

        assert_eq!(config.openai_api_key.expose_secret(), "sk-test");
        assert_eq!(config.supabase_url, "https://backend.example/rpc/sevs");
        assert_eq!(config.verify_token, "verify-me");
        assert_eq!(config.port, 8000);
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.oracle_model, "gpt-5-chat");
        assert_eq!(config.graph_base_url, "https://graph.facebook.com/v20.0");
    }

    #[test]
    fn missing_required_variable_names_it() {
        let mut env = full_env();
        env.remove("SUPABASE_KEY");

        let err = from_map(&env).unwrap_err();
        assert!(matches!(err, Error::MissingVar("SUPABASE_KEY")));
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let mut env = full_env();
        env.insert("WHATSAPP_TOKEN".into(), "   ".into());

        let err = from_map(&env).unwrap_err();
        assert!(matches!(err, Error::MissingVar("WHATSAPP_TOKEN")));
    }

    #[test]
    fn overrides_take_effect() {
        let mut env = full_env();
        env.insert("PORT".into(), "9111".into());
        env.insert("OPENAI_BASE_URL".into(), "http://127.0.0.1:1234/v1".into());
        env.insert("OPENAI_MODEL".into(), "gpt-5-mini".into());
        env.insert("GRAPH_BASE_URL".into(), "http://127.0.0.1:4321".into());

        let config = from_map(&env).unwrap();
        assert_eq!(config.port, 9111);
        assert_eq!(config.openai_base_url, "http://127.0.0.1:1234/v1");
        assert_eq!(config.oracle_model, "gpt-5-mini");
        assert_eq!(config.graph_base_url, "http://127.0.0.1:4321");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut env = full_env();
        env.insert("PORT".into(), "not-a-port".into());

        let err = from_map(&env).unwrap_err();
        assert!(matches!(err, Error::InvalidPort { value } if value == "not-a-port"));
    }
}

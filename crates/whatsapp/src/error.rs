use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A webhook delivery carried a message body but no sender id.
    #[error("inbound message has no sender id")]
    MissingSender,

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Graph API send failed ({status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

//! SEVS eligibility domain: wire types, backend query client, and the
//! deterministic reply composer.

pub mod client;
pub mod compose;
pub mod types;

pub use {
    client::{Error, LookupClient, Result},
    compose::compose_reply,
    types::{
        AlternateOption, BuildDateMatch, EligibilityQuery, EligibilityRow, ModelReport,
        QueryResultEnvelope, QueryType,
    },
};

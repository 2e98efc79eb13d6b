//! Wire types shared between the extraction oracle and the SEVS backend.

use serde::{Deserialize, Serialize};

fn default_limit() -> i64 {
    20
}

// The backend emits `null` where an empty list is meant.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Kind of lookup the oracle may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    VehicleEligibility,
    ExpiringSoon,
    ModelReportStatus,
}

/// Structured eligibility query, parsed from the oracle's tool-call
/// arguments and posted verbatim to the backend.
///
/// `query_type` is the only required field. Optional fields are omitted from
/// the serialized query; `limit` defaults to 20 when the oracle leaves it
/// out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityQuery {
    pub query_type: QueryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_month: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_days: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_months: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl EligibilityQuery {
    /// Minimal query of the given kind, every optional field unset.
    #[must_use]
    pub fn new(query_type: QueryType) -> Self {
        Self {
            query_type,
            make: None,
            model: None,
            variant: None,
            model_code: None,
            build_date: None,
            build_year: None,
            build_month: None,
            window_days: None,
            window_months: None,
            limit: default_limit(),
            cursor: None,
        }
    }
}

/// Matched build-date window bounds reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildDateMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

/// Model-report (compliance document) status attached to a variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    #[serde(default)]
    pub has_report: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mr_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

/// Near-match suggestion offered when no row matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlternateOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_code: Option<String>,
}

/// One candidate vehicle match returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRow {
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub model_code: String,
    #[serde(default)]
    pub eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date_match: Option<BuildDateMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiry: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiring_soon: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_report: Option<ModelReport>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternates: Vec<AlternateOption>,
}

/// Top-level success/data wrapper returned by the backend.
///
/// When `ok` is false the `data` field carries no meaning; when `ok` is true
/// and `data` is empty, `alternates` may offer near-matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultEnvelope {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<EligibilityRow>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub alternates: Vec<AlternateOption>,
}

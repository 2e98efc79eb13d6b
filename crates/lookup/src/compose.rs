//! Deterministic reply composition from backend query results.
//!
//! Pure functions only: identical envelopes always produce identical text.
//! Branch order is fixed: backend failure, then zero matches (with or
//! without near-matches), then multiple matches, then a single-row verdict.

use crate::types::{AlternateOption, EligibilityRow, QueryResultEnvelope};

/// Rows rendered in a multi-match summary.
const MULTI_MATCH_BULLETS: usize = 3;
/// Near-matches listed when no row matched at all.
const TOP_LEVEL_ALTERNATES: usize = 5;
/// Near-matches listed under a single-row verdict.
const ROW_ALTERNATES: usize = 3;

/// Render a query result as the reply text sent back to the user.
#[must_use]
pub fn compose_reply(result: &QueryResultEnvelope) -> String {
    if !result.ok {
        return "I couldn't retrieve SEVS data right now. Try again in a moment.".into();
    }
    match result.data.as_slice() {
        [] => compose_no_match(&result.alternates),
        [row] => compose_verdict(row),
        rows => compose_multi_match(rows),
    }
}

fn compose_no_match(alternates: &[AlternateOption]) -> String {
    if alternates.is_empty() {
        return "No matching SEVS entry found. Share the variant or model code and build \
                year/month and I'll re-check."
            .into();
    }
    let options = alternates
        .iter()
        .take(TOP_LEVEL_ALTERNATES)
        .map(alternate_label)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "No exact match. Closest options: {options}. Share the variant/model code and build \
         year/month."
    )
}

fn compose_multi_match(rows: &[EligibilityRow]) -> String {
    let mut lines = vec!["I found multiple matches:".to_string()];
    for row in rows.iter().take(MULTI_MATCH_BULLETS) {
        let verdict = if row.eligible { "Eligible" } else { "Not eligible" };
        let mut line = format!(
            "• {} {} {} {} — {verdict}",
            row.make, row.model, row.variant, row.model_code
        );
        if let Some(expires_on) = &row.expires_on {
            line.push_str(&format!("; expires {expires_on}"));
        }
        let report_status = row
            .model_report
            .as_ref()
            .filter(|report| report.has_report)
            .map_or("none", |report| report.status.as_deref().unwrap_or("none"));
        line.push_str(&format!("; MR {report_status}"));
        lines.push(line);
    }
    lines.push("Tell me the specific variant or model code and I'll confirm.".to_string());
    lines.join("\n")
}

fn compose_verdict(row: &EligibilityRow) -> String {
    let verdict = if row.eligible { "Eligible" } else { "Not eligible" };
    let mut parts = vec![format!("**{verdict}**")];

    if let Some(reason) = &row.eligibility_reason {
        parts.push(format!("Reason: {reason}."));
    }

    if let Some(window) = row
        .build_date_match
        .as_ref()
        .filter(|window| window.from.is_some() || window.to.is_some())
    {
        let from = window.from.as_deref().unwrap_or("?");
        let to = window.to.as_deref().unwrap_or("?");
        parts.push(format!("Build window: {from} → {to}."));
    }

    if let Some(expires_on) = &row.expires_on {
        let days = row
            .days_to_expiry
            .map(|days| format!(" ({days} days)"))
            .unwrap_or_default();
        parts.push(format!("SEVS entry expires {expires_on}{days}."));
    }

    if row.expiring_soon.unwrap_or(false) {
        parts.push("Flag: expiring soon. Start compliance steps ASAP.".into());
    }

    if let Some(report) = &row.model_report {
        if report.has_report {
            let mut line = format!(
                "Model report: {}",
                report.status.as_deref().unwrap_or("unknown")
            );
            if let Some(mr_number) = &report.mr_number {
                line.push_str(&format!(" — {mr_number}"));
            }
            if let Some(issuer) = &report.issuer {
                line.push_str(&format!(" ({issuer})"));
            }
            line.push('.');
            parts.push(line);
        } else {
            parts.push(
                "No valid model report on record; compliance not currently possible.".into(),
            );
        }
    }

    if !row.alternates.is_empty() {
        let closest = row
            .alternates
            .iter()
            .take(ROW_ALTERNATES)
            .map(alternate_label)
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Closest alternatives: {closest}."));
    }

    parts.join("\n")
}

// Missing variants render as "?", missing model codes as nothing at all.
fn alternate_label(alternate: &AlternateOption) -> String {
    let variant = alternate.variant.as_deref().unwrap_or("?");
    let model_code = alternate.model_code.as_deref().unwrap_or("");
    format!("{variant} {model_code}").trim().to_string()
}

//! Sequence counter state and form number formatting.

use serde::{Deserialize, Serialize};

/// Prefix shared by every form number.
pub const FORM_NO_PREFIX: &str = "SGWC";

/// Zone code used when a registration carries no zone.
pub const UNKNOWN_ZONE: &str = "NA";

/// Durable allocation state shared by every zone and operator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SequenceCounter {
    /// Last issued sequence value.
    pub last_id: i64,
}

/// Normalize a zone code: upper-cased, or `NA` when empty or absent.
#[must_use]
pub fn zone_code(zone: Option<&str>) -> String {
    match zone.map(str::trim) {
        Some(z) if !z.is_empty() => z.to_uppercase(),
        _ => UNKNOWN_ZONE.to_owned(),
    }
}

/// Compose `SGWC/<ZONE>/<sequence zero-padded to 6 digits>`.
#[must_use]
pub fn format_form_number(zone: Option<&str>, sequence: i64) -> String {
    format!("{FORM_NO_PREFIX}/{}/{sequence:06}", zone_code(zone))
}

/// Extract the numeric sequence from a form number.
#[must_use]
pub fn sequence_of(form_no: &str) -> Option<i64> {
    let mut parts = form_no.split('/');
    if parts.next()? != FORM_NO_PREFIX {
        return None;
    }
    let _zone = parts.next()?;
    let seq = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(seq)
}

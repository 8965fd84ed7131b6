use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One aggregated output record: a (year, month) bucket and its summed units.
///
/// Field names serialize capitalized because that is the wire shape the
/// dashboard consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SalesRow {
    pub year: String,
    pub month: String,
    pub sales: Decimal,
}

/// Three-letter name for a zero-based month index. An out-of-range index is
/// clamped into [0, 11] rather than rejected.
pub fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES[(month0 as usize).min(MONTH_NAMES.len() - 1)]
}

/// Position of a month name in the canonical sequence; unknown names sort
/// first.
pub fn month_index(name: &str) -> usize {
    MONTH_NAMES.iter().position(|m| *m == name).unwrap_or(0)
}

use std::str::FromStr;

use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::report::SalesRow;

/// One point of a single-year series, as shown in a chart and exported from
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String,
    pub sales: Decimal,
}

/// Keeps rows whose total meets the threshold.
pub fn filter_by_threshold(rows: &[SalesRow], threshold: Decimal) -> Vec<SalesRow> {
    rows.iter()
        .filter(|row| row.sales >= threshold)
        .cloned()
        .collect()
}

/// The (month, sales) series for one year, order preserved.
pub fn monthly_series(rows: &[SalesRow], year: &str) -> Vec<MonthlySales> {
    rows.iter()
        .filter(|row| row.year == year)
        .map(|row| MonthlySales {
            month: row.month.clone(),
            sales: row.sales,
        })
        .collect()
}

/// Encodes a series as the two-column download format.
pub fn to_csv(series: &[MonthlySales]) -> String {
    let mut out = String::from("month,sales\n");
    for point in series {
        out.push_str(&format!("{},{}\n", point.month, point.sales));
    }
    out
}

/// Decodes text produced by [`to_csv`] back into a series.
pub fn parse_csv(text: &str) -> Result<Vec<MonthlySales>, ReportError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut series = Vec::new();
    for result in reader.records() {
        let record = result?;
        series.push(MonthlySales {
            month: record.get(0).unwrap_or("").to_string(),
            sales: record
                .get(1)
                .and_then(|raw| Decimal::from_str(raw).ok())
                .unwrap_or(Decimal::ZERO),
        });
    }

    Ok(series)
}

/// Download name for one year's export.
pub fn export_filename(year: &str) -> String {
    format!("sales_{}.csv", year)
}

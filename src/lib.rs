pub mod error;
pub mod export;
pub mod loader;
pub mod report;
pub mod server;

use crate::error::ReportError;
use crate::loader::SalesSource;
use crate::report::SalesRow;

/// Loads a sales source and runs the monthly aggregation for one sku.
///
/// Both serving paths go through here: the HTTP endpoint handing a file path
/// in, and any caller that points at the raw file over HTTP instead.
pub async fn sales_report(
    source: &SalesSource,
    target_sku: &str,
) -> Result<Vec<SalesRow>, ReportError> {
    let csv_text = source.load().await?;
    report::aggregate_sales(&csv_text, target_sku)
}

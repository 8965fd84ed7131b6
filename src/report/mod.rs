mod aggregator;
mod columns;
mod row;

pub use aggregator::aggregate_sales;
pub use columns::SalesColumns;
pub use row::{month_index, month_name, SalesRow, MONTH_NAMES};

/// The single product series the dashboard tracks.
pub const DEFAULT_TARGET_SKU: &str = "MI-006";

use csv::StringRecord;

use crate::error::ReportError;

pub const DATE_COLUMN: &str = "date";
pub const SKU_COLUMN: &str = "sku";
pub const UNITS_COLUMN: &str = "units_sold";

/// Field positions resolved from the header row by column name, since the
/// dataset carries many columns we never look at.
#[derive(Debug, Clone, Copy)]
pub struct SalesColumns {
    pub date: usize,
    pub sku: usize,
    pub units: usize,
}

impl SalesColumns {
    pub fn from_headers(headers: &StringRecord) -> Result<Self, ReportError> {
        Ok(Self {
            date: find(headers, DATE_COLUMN)?,
            sku: find(headers, SKU_COLUMN)?,
            units: find(headers, UNITS_COLUMN)?,
        })
    }

    /// Highest index a record must reach for every required field to exist.
    pub fn max_index(&self) -> usize {
        self.date.max(self.sku).max(self.units)
    }
}

fn find(headers: &StringRecord, name: &'static str) -> Result<usize, ReportError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(ReportError::MissingColumn(name))
}

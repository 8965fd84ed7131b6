use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;

use crate::error::ReportError;
use crate::report::columns::SalesColumns;
use crate::report::row::{month_index, month_name, SalesRow};

/// Aggregates raw sales CSV text into per-month unit totals for one sku.
///
/// This is the whole pipeline behind both serving paths: the HTTP endpoint
/// reading from disk and a client that fetched the raw file itself. Batch
/// failures (unreadable input, missing header columns) surface as errors;
/// record-level problems are handled best-effort and never escalate.
pub fn aggregate_sales(csv_text: &str, target_sku: &str) -> Result<Vec<SalesRow>, ReportError> {
    // A header-only or empty file is an empty report, not a schema error.
    if csv_text.lines().filter(|line| !line.trim().is_empty()).count() <= 1 {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let columns = SalesColumns::from_headers(reader.headers()?)?;
    let mut aggregator = Aggregator::new(columns, target_sku);

    for result in reader.records() {
        match result {
            Ok(record) => aggregator.apply(&record),
            Err(e) => {
                tracing::debug!("Skipping invalid CSV line: {}", e);
            }
        }
    }

    Ok(aggregator.into_rows())
}

/// Running (year, month) totals for one aggregation pass. Created empty,
/// folded once per record, and consumed by [`Aggregator::into_rows`].
struct Aggregator<'a> {
    columns: SalesColumns,
    target_sku: &'a str,
    totals: HashMap<(i32, u32), Decimal>,
}

impl<'a> Aggregator<'a> {
    fn new(columns: SalesColumns, target_sku: &'a str) -> Self {
        Self {
            columns,
            target_sku,
            totals: HashMap::new(),
        }
    }

    /// Folds one record into the running totals.
    ///
    /// Row-level policy: a record too short to reach every required field is
    /// skipped, a foreign sku is skipped, an unparseable date drops the whole
    /// record, but an unparseable quantity keeps the record and counts as
    /// zero.
    fn apply(&mut self, record: &StringRecord) {
        if record.len() <= self.columns.max_index() {
            return;
        }

        // Rows with an empty sku field stay in the series.
        let sku = record.get(self.columns.sku).unwrap_or("");
        if !sku.is_empty() && sku != self.target_sku {
            return;
        }

        let Some(date) = record.get(self.columns.date).and_then(parse_record_date) else {
            return;
        };

        let units = record
            .get(self.columns.units)
            .and_then(|raw| Decimal::from_str(raw).ok())
            .unwrap_or(Decimal::ZERO);

        *self
            .totals
            .entry((date.year(), date.month0()))
            .or_insert(Decimal::ZERO) += units;
    }

    /// Materializes the totals as chronologically ordered result rows.
    fn into_rows(self) -> Vec<SalesRow> {
        let mut rows: Vec<SalesRow> = self
            .totals
            .into_iter()
            .map(|((year, month0), total)| SalesRow {
                year: year.to_string(),
                month: month_name(month0).to_string(),
                sales: total,
            })
            .collect();

        // Year first, then the month name's position in the canonical
        // sequence.
        rows.sort_by_key(|row| {
            (
                row.year.parse::<i32>().unwrap_or(i32::MIN),
                month_index(&row.month),
            )
        });

        rows
    }
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%m/%d/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "MI-006";

    fn aggregate(csv_text: &str) -> Vec<SalesRow> {
        aggregate_sales(csv_text, TARGET).unwrap()
    }

    mod aggregate_sales_tests {
        use super::*;

        #[test]
        fn test_two_records_same_month_sum_into_one_row() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-15,MI-006,5\n\
                 2022-01-20,MI-006,7\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].year, "2022");
            assert_eq!(rows[0].month, "Jan");
            assert_eq!(rows[0].sales, Decimal::from(12));
        }

        #[test]
        fn test_full_dataset_schema() {
            // Header shape of the real FMCG dataset, units_sold last.
            let rows = aggregate(
                "date,sku,brand,segment,category,channel,region,pack_type,price_unit,promotion_flag,delivery_days,stock_available,delivered_qty,units_sold\n\
                 2022-01-15,MI-006,,,,,,,,,,,,10\n\
                 2022-01-20,MI-006,,,,,,,,,,,,5\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].year, "2022");
            assert_eq!(rows[0].month, "Jan");
            assert_eq!(rows[0].sales, Decimal::from(15));
        }

        #[test]
        fn test_total_is_preserved_across_buckets() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-01,MI-006,1\n\
                 2022-02-01,MI-006,2\n\
                 2023-01-01,MI-006,3\n\
                 2023-12-31,MI-006,4\n",
            );

            let total: Decimal = rows.iter().map(|r| r.sales).sum();
            assert_eq!(total, Decimal::from(10));
        }

        #[test]
        fn test_foreign_sku_is_excluded() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-15,MI-001,100\n\
                 2022-01-20,MI-006,5\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(5));
        }

        #[test]
        fn test_empty_sku_is_included() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-15,,5\n\
                 2022-01-20,MI-006,7\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(12));
        }

        #[test]
        fn test_unparseable_date_drops_the_record() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 not-a-date,MI-006,100\n\
                 2022-01-20,MI-006,7\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(7));
        }

        #[test]
        fn test_unparseable_quantity_counts_as_zero() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-15,MI-006,lots\n\
                 2022-01-20,MI-006,7\n",
            );

            // Both records land in the Jan 2022 bucket; the bad quantity
            // contributes nothing but does not drop the record.
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(7));
        }

        #[test]
        fn test_empty_quantity_counts_as_zero() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-15,MI-006,\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::ZERO);
        }

        #[test]
        fn test_short_row_is_skipped() {
            let rows = aggregate(
                "date,sku,brand,units_sold\n\
                 2022-01-15,MI-006\n\
                 2022-01-20,MI-006,BrandA,7\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(7));
        }

        #[test]
        fn test_rows_sorted_by_year_then_month() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2023-02-01,MI-006,1\n\
                 2022-12-01,MI-006,2\n\
                 2023-01-01,MI-006,3\n\
                 2022-03-01,MI-006,4\n",
            );

            let order: Vec<(&str, &str)> = rows
                .iter()
                .map(|r| (r.year.as_str(), r.month.as_str()))
                .collect();
            assert_eq!(
                order,
                vec![
                    ("2022", "Mar"),
                    ("2022", "Dec"),
                    ("2023", "Jan"),
                    ("2023", "Feb"),
                ]
            );
        }

        #[test]
        fn test_no_duplicate_year_month_pairs() {
            let mut csv = String::from("date,sku,units_sold\n");
            for day in 1..=28 {
                csv.push_str(&format!("2022-06-{:02},MI-006,1\n", day));
            }

            let rows = aggregate(&csv);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(28));
        }

        #[test]
        fn test_empty_input_is_empty_report() {
            assert!(aggregate("").is_empty());
        }

        #[test]
        fn test_header_only_is_empty_report() {
            // No schema validation happens before the first data row, so a
            // header missing required columns is still an empty report.
            assert!(aggregate("date,sku,units_sold\n").is_empty());
            assert!(aggregate("wrong,header\n").is_empty());
        }

        #[test]
        fn test_missing_units_column_is_schema_error() {
            let result = aggregate_sales(
                "date,sku,brand\n\
                 2022-01-15,MI-006,BrandA\n",
                TARGET,
            );

            match result {
                Err(ReportError::MissingColumn(name)) => assert_eq!(name, "units_sold"),
                other => panic!("Expected MissingColumn error, got {:?}", other),
            }
        }

        #[test]
        fn test_crlf_line_endings() {
            let rows = aggregate(
                "date,sku,units_sold\r\n2022-01-15,MI-006,5\r\n2022-01-20,MI-006,7\r\n",
            );

            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].sales, Decimal::from(12));
        }

        #[test]
        fn test_decimal_quantities() {
            let rows = aggregate(
                "date,sku,units_sold\n\
                 2022-01-15,MI-006,1.5\n\
                 2022-01-20,MI-006,2.25\n",
            );

            assert_eq!(rows[0].sales, Decimal::from_str("3.75").unwrap());
        }
    }

    mod parse_record_date_tests {
        use super::*;

        #[test]
        fn test_iso_date() {
            assert_eq!(
                parse_record_date("2022-01-15"),
                NaiveDate::from_ymd_opt(2022, 1, 15)
            );
        }

        #[test]
        fn test_rfc3339_datetime() {
            assert_eq!(
                parse_record_date("2024-07-01T12:30:00Z"),
                NaiveDate::from_ymd_opt(2024, 7, 1)
            );
        }

        #[test]
        fn test_slash_date() {
            assert_eq!(
                parse_record_date("1/15/2022"),
                NaiveDate::from_ymd_opt(2022, 1, 15)
            );
        }

        #[test]
        fn test_garbage_is_none() {
            assert_eq!(parse_record_date("yesterday"), None);
            assert_eq!(parse_record_date(""), None);
            assert_eq!(parse_record_date("2022-13-40"), None);
        }
    }
}

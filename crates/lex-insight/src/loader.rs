//! Table loading.
//!
//! CSV files are read with polars (header row, schema inference over the first
//! 100 rows, date parsing) and converted into a [`Table`]. Reading falls back to
//! looser strategies when the standard reader rejects a file.

use crate::error::{InsightError, Result, ResultExt};
use crate::table::{Column, ColumnKind, Table};
use crate::utils::column_kind_for_dtype;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows sampled for schema inference.
const INFER_SCHEMA_ROWS: usize = 100;

/// Days from 0001-01-01 (CE) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

// =============================================================================
// CSV Loading
// =============================================================================

/// Load a `.csv` file into a [`Table`].
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(InsightError::UnsupportedFormat(path.display().to_string()));
    }
    if !path.exists() {
        return Err(InsightError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    info!("Loading dataset from: {}", path.display());
    let df = read_csv_with_fallbacks(path)?;
    info!("Dataset loaded successfully: {:?}", df.shape());

    table_from_dataframe(&df).context(format!("Converting {}", path.display()))
}

/// Parse CSV text (with a header row) into a [`Table`].
pub fn parse_csv(content: &str) -> Result<Table> {
    let df = csv_options()
        .into_reader_with_file_handle(Cursor::new(content.to_owned()))
        .finish()?;
    table_from_dataframe(&df)
}

fn csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_quote_char(Some(b'"'))
                .with_try_parse_dates(true),
        )
}

/// Read a CSV file, trying progressively looser strategies.
fn read_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    // Strategy 1: quote handling and date parsing
    match csv_options()
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: plain reader, no date parsing
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Loading without date parsing failed: {}", e),
    }

    // Strategy 3: pre-clean content
    let content = std::fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
    let cleaned = clean_csv_content(&content);
    CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(cleaned))
        .finish()
        .context(format!("Parsing {}", path.display()))
}

/// Collapse doubled quotes and drop blank lines.
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// DataFrame Conversion
// =============================================================================

/// Convert a polars DataFrame into a [`Table`], mapping each dtype to a
/// [`ColumnKind`]. Unrecognized dtypes are cast to text.
pub fn table_from_dataframe(df: &DataFrame) -> Result<Table> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| column_from_series(column.as_materialized_series()))
        .collect::<Result<Vec<_>>>()?;
    Table::new(columns)
}

fn column_from_series(series: &Series) -> Result<Column> {
    let name = series.name().as_str();
    let column = match column_kind_for_dtype(series.dtype()) {
        ColumnKind::Integer => {
            let values = series.cast(&DataType::Int64)?;
            Column::integer(name, values.i64()?.into_iter())
        }
        ColumnKind::Decimal => {
            let values = series.cast(&DataType::Float64)?;
            Column::decimal(name, values.f64()?.into_iter())
        }
        ColumnKind::Boolean => Column::boolean(name, series.bool()?.into_iter()),
        ColumnKind::DateTime => Column::datetime(name, datetime_values(series)?),
        ColumnKind::Text => {
            let values = series.cast(&DataType::String)?;
            Column::text(name, values.str()?.into_iter())
        }
    };
    Ok(column)
}

fn datetime_values(series: &Series) -> Result<Vec<Option<NaiveDateTime>>> {
    match series.dtype() {
        DataType::Date => {
            let days = series.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|d| d.and_then(date_from_epoch_days))
                .collect())
        }
        DataType::Datetime(unit, _) => {
            let unit = *unit;
            let raw = series.cast(&DataType::Int64)?;
            Ok(raw
                .i64()?
                .into_iter()
                .map(|v| v.and_then(|v| datetime_from_epoch(v, unit)))
                .collect())
        }
        other => Err(InsightError::UnsupportedFormat(format!(
            "column '{}' has non-temporal dtype {other}",
            series.name()
        ))),
    }
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)?
        .and_hms_opt(0, 0, 0)
}

fn datetime_from_epoch(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let datetime = match unit {
        TimeUnit::Nanoseconds => DateTime::from_timestamp(
            value.div_euclid(1_000_000_000),
            value.rem_euclid(1_000_000_000) as u32,
        ),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    datetime.map(|dt| dt.naive_utc())
}

// =============================================================================
// Built-in Sample
// =============================================================================

/// Six months of sales figures, used by the `sample` command.
pub fn sample_table() -> Result<Table> {
    let columns = vec![
        Column::text(
            "Month",
            ["Jan", "Feb", "Mar", "Apr", "May", "Jun"].map(Some),
        ),
        Column::integer("Sales", [4000, 3000, 2000, 2780, 1890, 2390].map(Some)),
        Column::integer("Expenses", [2400, 1398, 9800, 3908, 4800, 3800].map(Some)),
        Column::integer("Users", [240, 221, 229, 200, 229, 220].map(Some)),
    ];
    Table::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnData;

    // ==================== dataframe conversion tests ====================

    #[test]
    fn test_table_from_dataframe_kinds() {
        let df = df![
            "id" => [1i32, 2, 3],
            "price" => [Some(1.5f64), None, Some(f64::NAN)],
            "active" => [true, false, true],
            "city" => [Some("Oslo"), None, Some("Rome")],
        ]
        .unwrap();

        let table = table_from_dataframe(&df).unwrap();
        assert_eq!(table.column_names(), vec!["id", "price", "active", "city"]);
        assert_eq!(table.column("id").unwrap().kind(), ColumnKind::Integer);
        assert_eq!(table.column("price").unwrap().kind(), ColumnKind::Decimal);
        assert_eq!(table.column("active").unwrap().kind(), ColumnKind::Boolean);
        assert_eq!(table.column("city").unwrap().kind(), ColumnKind::Text);

        // NaN is stored as null
        assert_eq!(table.column("price").unwrap().null_count(), 2);
        assert_eq!(table.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_date_column_conversion() {
        let dates = Series::new("day".into(), [0i32, 1, 19_723])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![dates.into()]).unwrap();

        let table = table_from_dataframe(&df).unwrap();
        let column = table.column("day").unwrap();
        assert_eq!(column.kind(), ColumnKind::DateTime);
        let ColumnData::DateTime(values) = column.data() else {
            panic!("expected datetime storage");
        };
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(values[2], Some(expected));
        assert_eq!(
            values[0],
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap().and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_datetime_from_epoch_units() {
        let expected = DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc();
        assert_eq!(
            datetime_from_epoch(1_700_000_000_000, TimeUnit::Milliseconds),
            Some(expected)
        );
        assert_eq!(
            datetime_from_epoch(1_700_000_000_000_000, TimeUnit::Microseconds),
            Some(expected)
        );
        assert_eq!(
            datetime_from_epoch(1_700_000_000_000_000_000, TimeUnit::Nanoseconds),
            Some(expected)
        );
    }

    // ==================== csv tests ====================

    #[test]
    fn test_parse_csv() {
        let table = parse_csv("name,score\nann,1.5\nbob,\ncid,3\n").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column("name").unwrap().kind(), ColumnKind::Text);
        assert_eq!(table.column("score").unwrap().kind(), ColumnKind::Decimal);
        assert_eq!(table.column("score").unwrap().null_count(), 1);
    }

    #[test]
    fn test_load_csv_rejects_other_formats() {
        let err = load_csv("data.xlsx").unwrap_err();
        assert!(matches!(err, InsightError::UnsupportedFormat(_)));
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv("definitely/not/here.csv").unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[test]
    fn test_clean_csv_content() {
        let cleaned = clean_csv_content("a,b\n\n\"\"x\"\",1\n");
        assert_eq!(cleaned, "a,b\n\"x\",1");
    }

    // ==================== sample tests ====================

    #[test]
    fn test_sample_table() {
        let table = sample_table().unwrap();
        assert_eq!(table.row_count(), 6);
        assert_eq!(table.column_names(), vec!["Month", "Sales", "Expenses", "Users"]);
        assert_eq!(table.numeric_columns().len(), 3);
        assert_eq!(table.null_count(), 0);
    }
}

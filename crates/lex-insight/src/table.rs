//! In-memory table model consumed by the insight engine.
//!
//! A [`Table`] is an ordered list of uniquely named [`Column`]s that all share the
//! same row count. Each column stores its values in a typed [`ColumnData`] variant,
//! so the declared [`ColumnKind`] is fixed at construction and the analysis code
//! never inspects value types at runtime.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_insight::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     Column::text("Month", [Some("Jan"), Some("Feb"), None]),
//!     Column::integer("Sales", [Some(4000), Some(3000), Some(2000)]),
//! ])?;
//! assert_eq!(table.row_count(), 3);
//! ```

use crate::error::{InsightError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// Column Kinds
// =============================================================================

/// Declared kind of a column, assigned once when the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Text,
}

impl ColumnKind {
    /// Integer and decimal columns take part in numeric statistics.
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Decimal)
    }

    /// Text columns are the categorical columns for grouping and charts.
    #[inline]
    pub fn is_categorical(self) -> bool {
        matches!(self, ColumnKind::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Boolean => "boolean",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Column Storage
// =============================================================================

/// Typed storage for one column. `None` marks a null cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Decimal(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    DateTime(Vec<Option<NaiveDateTime>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Integer(_) => ColumnKind::Integer,
            ColumnData::Decimal(_) => ColumnKind::Decimal,
            ColumnData::Boolean(_) => ColumnKind::Boolean,
            ColumnData::DateTime(_) => ColumnKind::DateTime,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Decimal(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hashable view of a single cell, used for distinct counts and duplicate rows.
///
/// Decimals compare by bit pattern with `-0.0` folded into `0.0`; NaN never
/// reaches this type because decimal columns store NaN as null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKey<'a> {
    Null,
    Integer(i64),
    Decimal(u64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Text(&'a str),
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from typed data. Decimal NaN values become nulls.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let data = match data {
            ColumnData::Decimal(values) => ColumnData::Decimal(
                values
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()))
                    .collect(),
            ),
            other => other,
        };
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn integer(name: impl Into<String>, values: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values.into_iter().collect()))
    }

    pub fn decimal(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Decimal(values.into_iter().collect()))
    }

    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    pub fn datetime(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::new(name, ColumnData::DateTime(values.into_iter().collect()))
    }

    pub fn text<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Text(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether the cell at `row` is null. Out-of-range rows count as null.
    pub fn is_null(&self, row: usize) -> bool {
        matches!(self.cell_key(row), CellKey::Null)
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        match &self.data {
            ColumnData::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Decimal(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Boolean(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::DateTime(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Number of distinct non-null values.
    pub fn distinct_count(&self) -> usize {
        (0..self.len())
            .map(|row| self.cell_key(row))
            .filter(|key| !matches!(key, CellKey::Null))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Hashable key for the cell at `row`.
    pub fn cell_key(&self, row: usize) -> CellKey<'_> {
        let key = match &self.data {
            ColumnData::Integer(v) => v.get(row).copied().flatten().map(CellKey::Integer),
            ColumnData::Decimal(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|x| CellKey::Decimal(if x == 0.0 { 0.0f64.to_bits() } else { x.to_bits() })),
            ColumnData::Boolean(v) => v.get(row).copied().flatten().map(CellKey::Boolean),
            ColumnData::DateTime(v) => v.get(row).copied().flatten().map(CellKey::DateTime),
            ColumnData::Text(v) => v
                .get(row)
                .and_then(|x| x.as_deref())
                .map(CellKey::Text),
        };
        key.unwrap_or(CellKey::Null)
    }

    /// Values as `f64` in row order, or `None` for non-numeric columns.
    pub fn numeric_values(&self) -> Option<Vec<Option<f64>>> {
        match &self.data {
            ColumnData::Integer(v) => Some(v.iter().map(|x| x.map(|i| i as f64)).collect()),
            ColumnData::Decimal(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// Non-null numeric values in row order. Empty for non-numeric columns.
    pub fn non_null_numeric(&self) -> Vec<f64> {
        self.numeric_values()
            .map(|values| values.into_iter().flatten().collect())
            .unwrap_or_default()
    }

    /// Borrowed text cells, or `None` for non-text columns.
    pub fn text_values(&self) -> Option<&[Option<String>]> {
        match &self.data {
            ColumnData::Text(v) => Some(v),
            _ => None,
        }
    }
}

// =============================================================================
// Table
// =============================================================================

/// An immutable rectangular dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, checking that names are unique and all columns have the
    /// same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(InsightError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(InsightError::RaggedColumns {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Like [`column`](Self::column), but a missing name is an error.
    pub fn column_or_err(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| InsightError::ColumnNotFound(name.to_string()))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Total number of cells (`rows * columns`).
    pub fn cell_count(&self) -> usize {
        self.row_count.saturating_mul(self.columns.len())
    }

    /// Total number of null cells across all columns.
    pub fn null_count(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }

    /// Numeric columns in table order.
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.kind().is_numeric())
            .collect()
    }

    /// Categorical (text) columns in table order.
    pub fn categorical_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.kind().is_categorical())
            .collect()
    }

    /// Hashable key for a whole row.
    pub fn row_key(&self, row: usize) -> Vec<CellKey<'_>> {
        self.columns.iter().map(|c| c.cell_key(row)).collect()
    }
}

static_assertions::assert_impl_all!(Table: Send, Sync);

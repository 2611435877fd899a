//! Column profiling for dataset analysis.
//!
//! This module provides:
//! - Per-column profiles (distinct and null counts, numeric summaries, text entropy)
//! - Type composition of a table
//! - Distribution shape classification for numeric columns

mod distribution;
mod statistics;

pub use distribution::DistributionClassifier;

use crate::table::{Column, ColumnKind, Table};
use crate::types::ColumnProfile;
use std::collections::BTreeMap;
use tracing::debug;

/// Data profiler producing one [`ColumnProfile`] per column.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column of the table, in table order.
    pub fn profile_table(table: &Table) -> Vec<ColumnProfile> {
        table
            .columns()
            .iter()
            .map(|column| Self::profile_column(column, table.row_count()))
            .collect()
    }

    /// Profile a single column of a table with `rows` rows.
    pub fn profile_column(column: &Column, rows: usize) -> ColumnProfile {
        let missing = column.null_count();
        let missing_percent = if rows > 0 {
            missing as f64 / rows as f64
        } else {
            0.0
        };

        let numeric = if column.kind().is_numeric() {
            let summary = statistics::summarize_numeric(&column.non_null_numeric());
            if summary.is_none() {
                debug!(column = column.name(), "Numeric column is entirely null");
            }
            summary
        } else {
            None
        };

        let entropy = column
            .text_values()
            .and_then(|values| statistics::shannon_entropy(values.iter().flatten().map(String::as_str)));

        ColumnProfile {
            name: column.name().to_string(),
            kind: column.kind(),
            unique: column.distinct_count(),
            missing,
            missing_percent,
            numeric,
            entropy,
        }
    }

    /// Number of columns per kind. Only kinds present in the table appear.
    pub fn type_composition(table: &Table) -> BTreeMap<ColumnKind, usize> {
        let mut composition = BTreeMap::new();
        for column in table.columns() {
            *composition.entry(column.kind()).or_insert(0) += 1;
        }
        composition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed_table() -> Table {
        Table::new(vec![
            Column::text("region", [Some("north"), Some("south"), Some("north"), None]),
            Column::integer("sales", [Some(10), Some(20), Some(30), Some(40)]),
            Column::decimal("margin", [None, None, None, None]),
            Column::boolean("active", [Some(true), Some(false), None, Some(true)]),
        ])
        .unwrap()
    }

    // ==================== profile tests ====================

    #[test]
    fn test_profile_numeric_column() {
        let table = mixed_table();
        let profiles = DataProfiler::profile_table(&table);
        let sales = &profiles[1];

        assert_eq!(sales.name, "sales");
        assert_eq!(sales.kind, ColumnKind::Integer);
        assert_eq!(sales.unique, 4);
        assert_eq!(sales.missing, 0);
        let numeric = sales.numeric.as_ref().unwrap();
        assert_eq!(numeric.mean, Some(25.0));
        assert_eq!(numeric.median, Some(25.0));
        assert_eq!(numeric.min, Some(10.0));
        assert_eq!(numeric.max, Some(40.0));
        assert_eq!(numeric.p25, Some(17.5));
        assert_eq!(numeric.p75, Some(32.5));
        assert!(sales.entropy.is_none());
    }

    #[test]
    fn test_profile_all_null_numeric_column() {
        let table = mixed_table();
        let margin = DataProfiler::profile_column(table.column("margin").unwrap(), 4);

        assert_eq!(margin.missing, 4);
        assert_eq!(margin.missing_percent, 1.0);
        assert_eq!(margin.unique, 0);
        assert!(margin.numeric.is_none());
    }

    #[test]
    fn test_profile_text_column_has_entropy() {
        let table = mixed_table();
        let region = DataProfiler::profile_column(table.column("region").unwrap(), 4);

        assert_eq!(region.unique, 2);
        assert_eq!(region.missing, 1);
        assert_eq!(region.missing_percent, 0.25);
        assert!(region.numeric.is_none());
        // p = 2/3, 1/3
        let expected = -(2.0f64 / 3.0) * (2.0f64 / 3.0).log2() - (1.0f64 / 3.0) * (1.0f64 / 3.0).log2();
        assert!((region.entropy.unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_profile_boolean_column_has_no_stats() {
        let table = mixed_table();
        let active = DataProfiler::profile_column(table.column("active").unwrap(), 4);
        assert_eq!(active.unique, 2);
        assert!(active.numeric.is_none());
        assert!(active.entropy.is_none());
    }

    #[test]
    fn test_missing_percent_zero_rows() {
        let column = Column::integer("empty", Vec::<Option<i64>>::new());
        let profile = DataProfiler::profile_column(&column, 0);
        assert_eq!(profile.missing_percent, 0.0);
        assert!(profile.numeric.is_none());
    }

    // ==================== composition tests ====================

    #[test]
    fn test_type_composition_only_present_kinds() {
        let table = mixed_table();
        let composition = DataProfiler::type_composition(&table);

        assert_eq!(composition.get(&ColumnKind::Text), Some(&1));
        assert_eq!(composition.get(&ColumnKind::Integer), Some(&1));
        assert_eq!(composition.get(&ColumnKind::Decimal), Some(&1));
        assert_eq!(composition.get(&ColumnKind::Boolean), Some(&1));
        assert!(!composition.contains_key(&ColumnKind::DateTime));
    }
}

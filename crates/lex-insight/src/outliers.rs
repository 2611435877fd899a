//! Outlier detection for numeric columns.
//!
//! Two methods are supported, z-score and IQR fences. Both report 0-based
//! positions in the original row sequence; null cells are skipped and never
//! flagged. Degenerate inputs (too few values, zero spread, non-finite data)
//! produce an empty result instead of an error.

use crate::error::Result;
use crate::table::{Column, Table};
use crate::types::{AnomalyMethod, AnomalyResult};
use crate::utils::{mean, quantile_sorted, sample_std, sorted_values};
use tracing::{debug, warn};

/// Minimum number of non-null values for detection to run.
const MIN_VALUES: usize = 3;

/// IQR fence multiplier.
const IQR_MULTIPLIER: f64 = 1.5;

/// Detects outliers in numeric columns.
pub struct AnomalyDetector;

impl AnomalyDetector {
    /// Run `method` over every numeric column of the table, in table order.
    pub fn detect_table(table: &Table, method: AnomalyMethod, z_threshold: f64) -> Vec<AnomalyResult> {
        table
            .numeric_columns()
            .into_iter()
            .filter_map(|column| Self::detect_column(column, method, z_threshold))
            .collect()
    }

    /// Run `method` over one column. `None` for non-numeric columns.
    pub fn detect_column(column: &Column, method: AnomalyMethod, z_threshold: f64) -> Option<AnomalyResult> {
        let values = column.numeric_values()?;
        Some(AnomalyResult {
            column: column.name().to_string(),
            method,
            indices: Self::detect(column.name(), &values, method, z_threshold),
        })
    }

    /// Run `method` over the column called `name`.
    ///
    /// [`ColumnNotFound`](crate::InsightError::ColumnNotFound) for an unknown
    /// name, `Ok(None)` for a column that is not numeric.
    pub fn detect_named(
        table: &Table,
        name: &str,
        method: AnomalyMethod,
        z_threshold: f64,
    ) -> Result<Option<AnomalyResult>> {
        let column = table.column_or_err(name)?;
        Ok(Self::detect_column(column, method, z_threshold))
    }

    /// Look the method up by name. Unknown names yield an empty result.
    pub fn detect_by_name(
        column: &str,
        values: &[Option<f64>],
        method: &str,
        z_threshold: f64,
    ) -> Vec<usize> {
        match method.parse::<AnomalyMethod>() {
            Ok(method) => Self::detect(column, values, method, z_threshold),
            Err(err) => {
                debug!(column, "{err}, no anomalies reported");
                Vec::new()
            }
        }
    }

    /// Flag outliers among the non-null entries of `values`.
    pub fn detect(
        column: &str,
        values: &[Option<f64>],
        method: AnomalyMethod,
        z_threshold: f64,
    ) -> Vec<usize> {
        let present: Vec<(usize, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(idx, v)| v.map(|x| (idx, x)))
            .collect();

        if present.len() < MIN_VALUES {
            return Vec::new();
        }
        if present.iter().any(|(_, x)| !x.is_finite()) {
            warn!(column, "Non-finite values present, skipping outlier detection");
            return Vec::new();
        }

        let data: Vec<f64> = present.iter().map(|(_, x)| *x).collect();
        let Some((lower, upper)) = Self::bounds(column, &data, method, z_threshold) else {
            return Vec::new();
        };

        present
            .into_iter()
            .filter(|(_, x)| *x < lower || *x > upper)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Acceptance interval for the method. Values strictly outside are outliers.
    fn bounds(
        column: &str,
        data: &[f64],
        method: AnomalyMethod,
        z_threshold: f64,
    ) -> Option<(f64, f64)> {
        match method {
            AnomalyMethod::ZScore => {
                let mean = mean(data)?;
                let std = sample_std(data)?;
                if std <= 0.0 || !std.is_finite() {
                    debug!(column, "Zero standard deviation, no z-score outliers");
                    return None;
                }
                // |x - mean| / std > t  <=>  x outside mean -/+ t * std
                let spread = z_threshold * std;
                Some((mean - spread, mean + spread))
            }
            AnomalyMethod::Iqr => {
                let sorted = sorted_values(data);
                let q1 = quantile_sorted(&sorted, 0.25)?;
                let q3 = quantile_sorted(&sorted, 0.75)?;
                let iqr = q3 - q1;
                Some((q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_spike() -> Vec<Option<f64>> {
        let mut values: Vec<Option<f64>> = (0..20).map(|i| Some(10.0 + (i % 3) as f64)).collect();
        values.push(Some(100.0));
        values
    }

    // ==================== table lookup tests ====================

    #[test]
    fn test_detect_named() {
        let table = Table::new(vec![
            Column::decimal("x", with_spike()),
            Column::text("tag", std::iter::repeat_n(Some("t"), 21)),
        ])
        .unwrap();

        let result = AnomalyDetector::detect_named(&table, "x", AnomalyMethod::Iqr, 3.0)
            .unwrap()
            .unwrap();
        assert_eq!(result.method, AnomalyMethod::Iqr);
        assert_eq!(result.indices, vec![20]);

        assert!(
            AnomalyDetector::detect_named(&table, "tag", AnomalyMethod::ZScore, 3.0)
                .unwrap()
                .is_none()
        );
        let err = AnomalyDetector::detect_named(&table, "missing", AnomalyMethod::ZScore, 3.0)
            .unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    // ==================== z-score tests ====================

    #[test]
    fn test_zscore_flags_spike() {
        let values = with_spike();
        let indices = AnomalyDetector::detect("x", &values, AnomalyMethod::ZScore, 3.0);
        assert_eq!(indices, vec![20]);
    }

    #[test]
    fn test_zscore_constant_column_is_empty() {
        let values = vec![Some(5.0); 10];
        assert!(AnomalyDetector::detect("x", &values, AnomalyMethod::ZScore, 3.0).is_empty());
    }

    #[test]
    fn test_indices_refer_to_original_rows() {
        // Nulls ahead of the spike must not shift its index
        let mut values = vec![None, None];
        values.extend(with_spike());
        let indices = AnomalyDetector::detect("x", &values, AnomalyMethod::ZScore, 3.0);
        assert_eq!(indices, vec![22]);

        let indices = AnomalyDetector::detect("x", &values, AnomalyMethod::Iqr, 3.0);
        assert_eq!(indices, vec![22]);
    }

    #[test]
    fn test_too_few_values() {
        let values = vec![Some(1.0), None, Some(1000.0)];
        assert!(AnomalyDetector::detect("x", &values, AnomalyMethod::Iqr, 3.0).is_empty());
    }

    // ==================== IQR tests ====================

    #[test]
    fn test_iqr_fences() {
        // Sorted: 1 2 2 3 3 4 4 5 7 20 -> Q1 = 2.25, Q3 = 4.75, fences [-1.5, 8.5]
        let values: Vec<Option<f64>> = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 20.0, 2.0, 3.0, 4.0]
            .into_iter()
            .map(Some)
            .collect();
        let indices = AnomalyDetector::detect("x", &values, AnomalyMethod::Iqr, 3.0);
        assert_eq!(indices, vec![6]);
    }

    #[test]
    fn test_unknown_method_name_is_empty() {
        let values = with_spike();
        assert!(AnomalyDetector::detect_by_name("x", &values, "isolation_forest", 3.0).is_empty());
        assert_eq!(AnomalyDetector::detect_by_name("x", &values, "zscore", 3.0), vec![20]);
    }

    #[test]
    fn test_non_finite_values_are_skipped() {
        let values = vec![Some(1.0), Some(2.0), Some(f64::INFINITY), Some(3.0)];
        assert!(AnomalyDetector::detect("x", &values, AnomalyMethod::ZScore, 3.0).is_empty());
    }

    #[test]
    fn test_detect_table_numeric_only() {
        let table = Table::new(vec![
            Column::text("label", [Some("a"), Some("b"), Some("c")]),
            Column::integer("n", [Some(1), Some(2), Some(3)]),
        ])
        .unwrap();
        let results = AnomalyDetector::detect_table(&table, AnomalyMethod::Iqr, 3.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].column, "n");
        assert_eq!(results[0].method, AnomalyMethod::Iqr);
        assert!(results[0].indices.is_empty());
    }
}

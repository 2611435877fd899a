//! Distribution shape classification for numeric columns.

use super::statistics::central_moments;
use crate::table::Table;
use crate::types::{DistributionResult, DistributionShape};
use tracing::debug;

/// Minimum number of non-null values needed for a shape estimate.
const MIN_VALUES: usize = 3;

/// Classifies numeric columns by biased sample skewness and excess kurtosis.
pub struct DistributionClassifier;

impl DistributionClassifier {
    /// Classify every numeric column of the table, in table order.
    pub fn classify_table(table: &Table) -> Vec<DistributionResult> {
        table
            .numeric_columns()
            .into_iter()
            .map(|column| Self::classify(column.name(), &column.non_null_numeric()))
            .collect()
    }

    /// Classify one column's non-null values.
    pub fn classify(column: &str, values: &[f64]) -> DistributionResult {
        let (shape, skewness, kurtosis) = Self::shape_of(column, values);
        DistributionResult {
            column: column.to_string(),
            shape,
            skewness,
            kurtosis,
        }
    }

    fn shape_of(column: &str, values: &[f64]) -> (DistributionShape, f64, f64) {
        if values.len() < MIN_VALUES {
            return (DistributionShape::InsufficientData, 0.0, 0.0);
        }

        let Some((m2, m3, m4)) = central_moments(values) else {
            return (DistributionShape::Unknown, 0.0, 0.0);
        };
        if m2 <= 0.0 || !m2.is_finite() {
            debug!(column, "Zero variance, distribution shape unknown");
            return (DistributionShape::Unknown, 0.0, 0.0);
        }

        let skewness = m3 / m2.powf(1.5);
        let kurtosis = m4 / (m2 * m2) - 3.0;
        if !skewness.is_finite() || !kurtosis.is_finite() {
            debug!(column, "Non-finite moments, distribution shape unknown");
            return (DistributionShape::Unknown, 0.0, 0.0);
        }

        let shape = if skewness.abs() < 0.5 && kurtosis.abs() < 3.0 {
            DistributionShape::Normal
        } else if skewness > 1.0 {
            DistributionShape::RightSkewed
        } else if skewness < -1.0 {
            DistributionShape::LeftSkewed
        } else {
            DistributionShape::Other
        };

        (shape, skewness, kurtosis)
    }
}

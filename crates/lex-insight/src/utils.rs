//! Shared utilities for the insight engine.
//!
//! This module contains the numeric primitives every analyzer builds on, the
//! polars dtype mapping used by the loader, and small formatting helpers for
//! human-readable messages.
//!
//! All variance-based helpers use the sample convention (`ddof = 1`).

use crate::table::ColumnKind;
use polars::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is a date or datetime type.
///
/// `Time` is deliberately absent: a time of day has no calendar date and is
/// loaded as text.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Datetime(_, _) | DataType::Date)
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Map a polars DataType onto the closed set of column kinds.
pub fn column_kind_for_dtype(dtype: &DataType) -> ColumnKind {
    if is_integer_dtype(dtype) {
        ColumnKind::Integer
    } else if is_float_dtype(dtype) {
        ColumnKind::Decimal
    } else if is_boolean_dtype(dtype) {
        ColumnKind::Boolean
    } else if is_datetime_dtype(dtype) {
        ColumnKind::DateTime
    } else {
        ColumnKind::Text
    }
}

// =============================================================================
// Numeric Utilities
// =============================================================================

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// True when every value equals the first. Vacuously true for an empty slice.
///
/// Exact comparison, so a constant decimal column is caught even when its
/// floating-point mean is off by one ulp.
pub fn is_constant(values: &[f64]) -> bool {
    values
        .split_first()
        .is_none_or(|(first, rest)| rest.iter().all(|v| v == first))
}

/// Sample variance (`ddof = 1`), `None` with fewer than two values.
/// Exactly zero for constant input.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if is_constant(values) {
        return Some(0.0);
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(sum_sq / (values.len() as f64 - 1.0))
}

/// Sample standard deviation (`ddof = 1`), `None` with fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Copy and sort values ascending.
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Quantile of sorted data with linear interpolation between the two nearest
/// ranks. `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], quantile: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = quantile.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Replace a non-finite result with `None`.
#[inline]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

// =============================================================================
// Formatting Utilities
// =============================================================================

/// Format an integer count with `,` thousands separators.
///
/// # Example
///
/// ```rust,ignore
/// use lex_insight::utils::format_thousands;
///
/// assert_eq!(format_thousands(1234567), "1,234,567");
/// ```
pub fn format_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== dtype tests ====================

    #[test]
    fn test_column_kind_for_dtype() {
        assert_eq!(column_kind_for_dtype(&DataType::Int32), ColumnKind::Integer);
        assert_eq!(column_kind_for_dtype(&DataType::UInt64), ColumnKind::Integer);
        assert_eq!(column_kind_for_dtype(&DataType::Float32), ColumnKind::Decimal);
        assert_eq!(column_kind_for_dtype(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind_for_dtype(&DataType::Date), ColumnKind::DateTime);
        assert_eq!(column_kind_for_dtype(&DataType::String), ColumnKind::Text);
        assert_eq!(column_kind_for_dtype(&DataType::Time), ColumnKind::Text);
    }

    // ==================== numeric tests ====================

    #[test]
    fn test_mean_and_sample_std() {
        // Values: 1..=5, mean 3, sample variance 10/4 = 2.5
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(mean(&values), Some(3.0));
        assert_eq!(sample_variance(&values), Some(2.5));
        assert!((sample_std(&values).unwrap() - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_small_inputs() {
        assert_eq!(mean(&[]), None);
        assert_eq!(sample_std(&[4.0]), None);
        assert_eq!(sample_std(&[4.0, 4.0]), Some(0.0));
    }

    #[test]
    fn test_constant_decimal_has_zero_variance() {
        let values = [0.1; 10];
        assert!(is_constant(&values));
        assert!(is_constant(&[]));
        assert!(!is_constant(&[0.1, 0.2]));
        assert_eq!(sample_variance(&values), Some(0.0));
        assert_eq!(sample_std(&values), Some(0.0));
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile_sorted(&sorted, 0.75), Some(3.25));
        assert_eq!(quantile_sorted(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_sorted_values() {
        assert_eq!(sorted_values(&[3.0, -1.0, 2.0]), vec![-1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_finite() {
        assert_eq!(finite(1.0), Some(1.0));
        assert_eq!(finite(f64::NAN), None);
        assert_eq!(finite(f64::INFINITY), None);
    }

    // ==================== formatting tests ====================

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}

//! Statistical helpers for column profiling.

use crate::types::NumericSummary;
use crate::utils::{finite, is_constant, mean, quantile_sorted, sample_std, sorted_values};
use std::collections::HashMap;

/// Guard against `log2(0)` in the entropy sum.
const ENTROPY_EPSILON: f64 = 1e-10;

/// Summary statistics over the non-null values of a numeric column.
///
/// Returns `None` for an empty slice so callers report the fields as absent
/// rather than zero.
pub(crate) fn summarize_numeric(values: &[f64]) -> Option<NumericSummary> {
    let sorted = sorted_values(values);
    let min = *sorted.first()?;
    let max = *sorted.last()?;

    Some(NumericSummary {
        mean: mean(values).and_then(finite),
        median: quantile_sorted(&sorted, 0.5).and_then(finite),
        std: sample_std(values).and_then(finite),
        min: finite(min),
        max: finite(max),
        p25: quantile_sorted(&sorted, 0.25).and_then(finite),
        p75: quantile_sorted(&sorted, 0.75).and_then(finite),
    })
}

/// Second, third and fourth central moments (divided by `n`). All zero for
/// constant input.
pub(crate) fn central_moments(values: &[f64]) -> Option<(f64, f64, f64)> {
    let mean = mean(values)?;
    if is_constant(values) {
        return Some((0.0, 0.0, 0.0));
    }
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for value in values {
        let d = value - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Some((m2 / n, m3 / n, m4 / n))
}

/// Shannon entropy in bits over the normalized value counts.
///
/// Returns `None` when there are no values to count.
pub(crate) fn shannon_entropy<'a>(values: impl IntoIterator<Item = &'a str>) -> Option<f64> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return None;
    }

    let total = total as f64;
    let entropy = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * (p + ENTROPY_EPSILON).log2()
        })
        .sum::<f64>();
    Some(entropy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_numeric() {
        let summary = summarize_numeric(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.mean, Some(2.5));
        assert_eq!(summary.median, Some(2.5));
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(4.0));
        assert_eq!(summary.p25, Some(1.75));
        assert_eq!(summary.p75, Some(3.25));
        // Sample variance of 1..=4 is 5/3
        assert!((summary.std.unwrap() - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_summarize_single_value_has_no_std() {
        let summary = summarize_numeric(&[7.0]).unwrap();
        assert_eq!(summary.mean, Some(7.0));
        assert_eq!(summary.std, None);
    }

    #[test]
    fn test_summarize_overflow_drops_non_finite_fields() {
        let summary = summarize_numeric(&[1e308, 1e308, 1.0]).unwrap();
        assert_eq!(summary.mean, None);
        assert_eq!(summary.std, None);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.max, Some(1e308));
        assert_eq!(summary.median, Some(1e308));

        let summary = summarize_numeric(&[1.0, 2.0, f64::INFINITY]).unwrap();
        assert_eq!(summary.max, None);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.min, Some(1.0));
    }

    #[test]
    fn test_summarize_empty() {
        assert!(summarize_numeric(&[]).is_none());
    }

    #[test]
    fn test_central_moments_symmetric() {
        let (m2, m3, _) = central_moments(&[1.0, 2.0, 3.0]).unwrap();
        assert!((m2 - 2.0 / 3.0).abs() < 1e-12);
        assert!(m3.abs() < 1e-12);
    }

    #[test]
    fn test_entropy_uniform_two_values() {
        let entropy = shannon_entropy(["a", "b", "a", "b"]).unwrap();
        assert!((entropy - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_entropy_single_value_is_zero() {
        let entropy = shannon_entropy(["x", "x", "x"]).unwrap();
        assert!(entropy.abs() < 1e-6);
        assert!(shannon_entropy(std::iter::empty()).is_none());
    }
}

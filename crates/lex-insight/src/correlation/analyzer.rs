//! Pearson correlation over pairwise-complete observations.

use crate::table::Table;
use crate::types::{CorrelationAnalysis, CorrelationEntry, CorrelationMatrix};
use crate::utils::{is_constant, sample_variance};
use std::cmp::Ordering;
use tracing::debug;

/// Pearson coefficient of two equally long samples.
///
/// `None` with fewer than two observations, zero variance on either side, or a
/// non-finite result.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return None;
    }
    let (x, y) = (&x[..n], &y[..n]);
    if is_constant(x) || is_constant(y) {
        return None;
    }
    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx <= 0.0 || syy <= 0.0 {
        return None;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

/// Computes correlations between the numeric columns of a table.
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// Matrix plus the pairs whose `|r|` exceeds `threshold`.
    pub fn analyze(table: &Table, threshold: f64) -> CorrelationAnalysis {
        let matrix = Self::matrix(table);
        let strong = Self::strong_pairs(&matrix, threshold);
        CorrelationAnalysis { strong, matrix }
    }

    /// Full Pearson matrix over numeric columns in table order.
    ///
    /// Empty when there are fewer than two numeric columns.
    pub fn matrix(table: &Table) -> CorrelationMatrix {
        let numeric = table.numeric_columns();
        if numeric.len() < 2 {
            debug!(
                numeric_columns = numeric.len(),
                "Fewer than two numeric columns, skipping correlations"
            );
            return CorrelationMatrix::default();
        }

        let columns: Vec<String> = numeric.iter().map(|c| c.name().to_string()).collect();
        let series: Vec<Vec<Option<f64>>> = numeric
            .iter()
            .map(|c| c.numeric_values().unwrap_or_default())
            .collect();

        let size = columns.len();
        let mut values = vec![vec![None; size]; size];

        for i in 0..size {
            let own: Vec<f64> = series[i].iter().flatten().copied().collect();
            values[i][i] = sample_variance(&own)
                .filter(|v| *v > 0.0 && v.is_finite())
                .map(|_| 1.0);

            for j in (i + 1)..size {
                let (x, y): (Vec<f64>, Vec<f64>) = series[i]
                    .iter()
                    .zip(series[j].iter())
                    .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                    .unzip();

                let r = pearson(&x, &y);
                if r.is_none() {
                    debug!(
                        col1 = %columns[i],
                        col2 = %columns[j],
                        observations = x.len(),
                        "Correlation undefined"
                    );
                }
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix { columns, values }
    }

    /// Defined pairs `(i, j)`, `i < j`, with `|r| > threshold`, in matrix order.
    pub fn strong_pairs(matrix: &CorrelationMatrix, threshold: f64) -> Vec<CorrelationEntry> {
        Self::defined_pairs(matrix)
            .filter(|entry| entry.is_strong(threshold))
            .collect()
    }

    /// Every defined pair sorted by `|r|` descending. Ties keep matrix order.
    pub fn pairwise(matrix: &CorrelationMatrix) -> Vec<CorrelationEntry> {
        let mut pairs: Vec<CorrelationEntry> = Self::defined_pairs(matrix).collect();
        pairs.sort_by(|a, b| {
            b.pearson
                .abs()
                .partial_cmp(&a.pearson.abs())
                .unwrap_or(Ordering::Equal)
        });
        pairs
    }

    /// Keep the entries with `|r| > threshold`.
    pub fn find_highly_correlated(
        correlations: &[CorrelationEntry],
        threshold: f64,
    ) -> Vec<CorrelationEntry> {
        correlations
            .iter()
            .filter(|entry| entry.is_strong(threshold))
            .cloned()
            .collect()
    }

    fn defined_pairs(matrix: &CorrelationMatrix) -> impl Iterator<Item = CorrelationEntry> + '_ {
        let size = matrix.columns.len();
        (0..size).flat_map(move |i| {
            ((i + 1)..size).filter_map(move |j| {
                matrix.values[i][j].map(|r| CorrelationEntry {
                    col1: matrix.columns[i].clone(),
                    col2: matrix.columns[j].clone(),
                    pearson: r,
                })
            })
        })
    }
}

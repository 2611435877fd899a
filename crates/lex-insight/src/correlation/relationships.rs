//! Relationship detection between columns.

use crate::config::AnalysisConfig;
use crate::table::{Column, Table};
use crate::types::{CorrelationEntry, RelationshipEntry};
use crate::utils::{mean, sample_std};
use std::collections::BTreeMap;
use tracing::debug;

const MODERATE: &str = "moderate";

/// Finds strong correlations and categorical-numeric group differences.
pub struct RelationshipDetector;

impl RelationshipDetector {
    /// Relationship entries in detection order, correlations first, truncated
    /// to `config.relationship_result_cap`.
    ///
    /// `strong` is the strong-pair list produced by the correlation analyzer.
    pub fn detect(
        table: &Table,
        strong: &[CorrelationEntry],
        config: &AnalysisConfig,
    ) -> Vec<RelationshipEntry> {
        let mut relationships: Vec<RelationshipEntry> = strong
            .iter()
            .map(|entry| RelationshipEntry::StrongCorrelation {
                columns: [entry.col1.clone(), entry.col2.clone()],
                strength: entry.pearson.abs(),
            })
            .collect();

        let categorical = table.categorical_columns();
        let numeric = table.numeric_columns();

        for cat in categorical.iter().take(config.max_categorical_columns_scanned) {
            for num in numeric.iter().take(config.max_numeric_columns_scanned) {
                let Some(variation) = Self::group_mean_variation(cat, num) else {
                    continue;
                };
                if variation > config.categorical_numeric_variance_threshold {
                    relationships.push(RelationshipEntry::CategoricalNumericRelationship {
                        categorical: cat.name().to_string(),
                        numeric: num.name().to_string(),
                        strength_label: MODERATE.to_string(),
                        variation,
                    });
                }
            }
        }

        relationships.truncate(config.relationship_result_cap);
        relationships
    }

    /// Coefficient of variation of the numeric column's per-category means.
    ///
    /// Rows with a null category or a null value are ignored. `None` when fewer
    /// than two groups remain or the mean of means is zero.
    pub fn group_mean_variation(categorical: &Column, numeric: &Column) -> Option<f64> {
        let labels = categorical.text_values()?;
        let values = numeric.numeric_values()?;

        let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for (label, value) in labels.iter().zip(values) {
            if let (Some(label), Some(value)) = (label.as_deref(), value) {
                let slot = groups.entry(label).or_insert((0.0, 0));
                slot.0 += value;
                slot.1 += 1;
            }
        }

        if groups.len() < 2 {
            return None;
        }

        let means: Vec<f64> = groups
            .values()
            .map(|(sum, count)| sum / *count as f64)
            .collect();
        let center = mean(&means)?;
        if center == 0.0 {
            debug!(
                categorical = categorical.name(),
                numeric = numeric.name(),
                "Mean of group means is zero, skipping pair"
            );
            return None;
        }

        let ratio = sample_std(&means)? / center;
        ratio.is_finite().then_some(ratio)
    }
}

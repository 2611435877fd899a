//! Narrative insights derived from the computed statistics.

use crate::config::AnalysisConfig;
use crate::outliers::AnomalyDetector;
use crate::table::{Column, Table};
use crate::types::{AnomalyMethod, InsightItem, InsightSeverity, QualityAssessment};
use crate::utils::{finite, format_thousands, mean, sample_std};
use std::collections::BTreeMap;

pub const MISSING_DATA_TITLE: &str = "Missing Data Detected";
pub const DUPLICATE_ROWS_TITLE: &str = "Duplicate Rows Found";
pub const COMPLETENESS_TITLE: &str = "Data Completeness";

/// Builds the ordered insight list for a report.
///
/// Order is fixed: missing-data alert, duplicate-rows alert, per-column outlier
/// insights, then the completeness summary.
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn generate(
        table: &Table,
        quality: &QualityAssessment,
        config: &AnalysisConfig,
    ) -> Vec<InsightItem> {
        let mut insights = Vec::new();

        if quality.missing_count > 0 {
            let percent = 100.0 * quality.missing_count as f64 / table.cell_count().max(1) as f64;
            insights.push(InsightItem {
                severity: InsightSeverity::Alert,
                title: MISSING_DATA_TITLE.to_string(),
                message: format!(
                    "Found {} missing values ({:.1}% of total data)",
                    format_thousands(quality.missing_count),
                    percent
                ),
                description: "Missing values can affect analysis accuracy. Consider imputation or removal."
                    .to_string(),
                recommendation: Some(
                    "Clean missing values using forward fill, interpolation, or removal strategies."
                        .to_string(),
                ),
                metrics: None,
            });
        }

        if quality.duplicate_count > 0 {
            insights.push(InsightItem {
                severity: InsightSeverity::Alert,
                title: DUPLICATE_ROWS_TITLE.to_string(),
                message: format!("Detected {} duplicate rows", quality.duplicate_count),
                description: "Duplicate rows can skew analysis results.".to_string(),
                recommendation: Some("Remove duplicate rows to improve data quality.".to_string()),
                metrics: None,
            });
        }

        for column in table
            .numeric_columns()
            .into_iter()
            .take(config.max_numeric_columns_for_insights)
        {
            if let Some(insight) = Self::outlier_insight(column, config) {
                insights.push(insight);
            }
        }

        insights.push(Self::completeness_insight(quality.completeness));
        insights
    }

    fn outlier_insight(column: &Column, config: &AnalysisConfig) -> Option<InsightItem> {
        let name = column.name();
        let values = column.numeric_values()?;
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let mean = mean(&present).and_then(finite)?;
        let std = sample_std(&present).filter(|s| *s > 0.0)?;

        let count = AnomalyDetector::detect(
            name,
            &values,
            AnomalyMethod::ZScore,
            config.outlier_z_threshold,
        )
        .len();
        if count == 0 {
            return None;
        }

        let metrics = BTreeMap::from([
            ("mean".to_string(), mean),
            ("std_dev".to_string(), std),
            ("outlier_count".to_string(), count as f64),
        ]);

        Some(InsightItem {
            severity: InsightSeverity::General,
            title: format!("Outliers in {name}"),
            message: format!(
                "Found {count} potential outliers (|z-score| > {})",
                config.outlier_z_threshold
            ),
            description: format!(
                "Column \"{name}\" has {count} values that deviate significantly from the mean."
            ),
            recommendation: None,
            metrics: Some(metrics),
        })
    }

    fn completeness_insight(completeness: f64) -> InsightItem {
        let percent = completeness * 100.0;
        InsightItem {
            severity: InsightSeverity::General,
            title: COMPLETENESS_TITLE.to_string(),
            message: format!("Dataset is {percent:.1}% complete"),
            description: format!("Your dataset has good data quality with {percent:.1}% completeness."),
            recommendation: None,
            metrics: Some(BTreeMap::from([(
                "completeness_score".to_string(),
                completeness,
            )])),
        }
    }
}

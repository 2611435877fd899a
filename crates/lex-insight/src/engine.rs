//! Analysis orchestration.
//!
//! [`analyze`] runs every analyzer over a borrowed [`Table`] and assembles one
//! immutable [`AnalysisReport`]. The only failures it surfaces are input-shape
//! rejections; numeric degradations inside individual analyzers are absorbed
//! and logged.

use crate::config::AnalysisConfig;
use crate::correlation::{CorrelationAnalyzer, RelationshipDetector};
use crate::error::{InsightError, Result};
use crate::outliers::AnomalyDetector;
use crate::profiler::{DataProfiler, DistributionClassifier};
use crate::quality::{DataQualityAssessor, TableValidator};
use crate::reporting::{InsightGenerator, VisualizationSuggester};
use crate::table::Table;
use crate::types::{AnalysisReport, AnomalyMethod, ReportMetadata};
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info};

/// Analyze a table with the given configuration.
///
/// # Errors
///
/// [`InsightError::NoColumns`] when the table has no columns, then
/// [`InsightError::EmptyTable`] when it has no rows.
pub fn analyze(table: &Table, config: &AnalysisConfig) -> Result<AnalysisReport> {
    InsightEngine::new(config.clone()).analyze(table)
}

/// Reusable analyzer bound to one configuration.
#[derive(Debug, Clone, Default)]
pub struct InsightEngine {
    config: AnalysisConfig,
}

impl InsightEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Validate `config` first. [`InsightError::InvalidConfig`] if it is rejected.
    pub fn try_new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, table: &Table) -> Result<AnalysisReport> {
        Self::check_shape(table)?;

        let start_time = Instant::now();
        let config = &self.config;
        info!(
            source = %config.source_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "Starting analysis"
        );

        debug!("Profiling columns...");
        let columns = DataProfiler::profile_table(table);
        let type_composition = DataProfiler::type_composition(table);

        debug!("Assessing data quality...");
        let data_quality = DataQualityAssessor::assess(table);
        let validation = TableValidator::validate(table);

        debug!("Computing correlations...");
        let correlation = CorrelationAnalyzer::analyze(table, config.correlation_threshold);
        let pairwise_correlations = CorrelationAnalyzer::pairwise(&correlation.matrix);
        let relationships = RelationshipDetector::detect(table, &correlation.strong, config);

        debug!("Classifying distributions and anomalies...");
        let distributions = DistributionClassifier::classify_table(table);
        let anomalies =
            AnomalyDetector::detect_table(table, AnomalyMethod::ZScore, config.outlier_z_threshold);

        let insights = InsightGenerator::generate(table, &data_quality, config);
        let visualizations = VisualizationSuggester::suggest(table);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            insights = insights.len(),
            strong_correlations = correlation.strong.len(),
            relationships = relationships.len(),
            quality_score = data_quality.quality_score,
            duration_ms,
            "Analysis complete"
        );

        Ok(AnalysisReport {
            metadata: ReportMetadata {
                source_name: config.source_name.clone(),
                rows: table.row_count(),
                columns: table.column_count(),
                generated_at: Local::now().to_rfc3339(),
                duration_ms,
            },
            columns,
            type_composition,
            insights,
            data_quality,
            correlation,
            pairwise_correlations,
            relationships,
            distributions,
            anomalies,
            visualizations,
            validation,
        })
    }

    fn check_shape(table: &Table) -> Result<()> {
        if table.column_count() == 0 {
            return Err(InsightError::NoColumns);
        }
        if table.row_count() == 0 {
            return Err(InsightError::EmptyTable);
        }
        Ok(())
    }
}

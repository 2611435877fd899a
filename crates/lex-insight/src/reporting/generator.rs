use crate::error::{Result, ResultExt};
use crate::types::{AnalysisReport, InsightSeverity, RelationshipEntry};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Suffix appended to the base name of emitted report files.
const REPORT_SUFFIX: &str = "_insights.json";

/// Writes reports to disk and renders them for terminals.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a report with `base_name` is written to.
    pub fn report_path(&self, base_name: &str) -> PathBuf {
        self.output_dir.join(format!("{base_name}{REPORT_SUFFIX}"))
    }

    /// Write a report to a pretty-printed JSON file.
    ///
    /// If `base_name` is "sales", the file will be "sales_insights.json".
    pub fn write_report_to_file(&self, report: &AnalysisReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let report_path = self.report_path(base_name);
        let mut file = File::create(&report_path)
            .context(format!("Creating {}", report_path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Load a report previously written by [`write_report_to_file`](Self::write_report_to_file).
    pub fn read_report_from_file(path: &Path) -> Result<AnalysisReport> {
        let raw = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Human-readable multi-line summary for terminal output.
    pub fn render_summary(report: &AnalysisReport) -> String {
        let mut out = String::new();
        let meta = &report.metadata;
        let quality = &report.data_quality;

        out.push_str(&format!(
            "Dataset: {} ({} rows x {} columns)\n",
            meta.source_name, meta.rows, meta.columns
        ));
        out.push_str(&format!(
            "Quality score: {:.2}  Completeness: {:.1}%\n",
            quality.quality_score,
            quality.completeness * 100.0
        ));

        let composition: Vec<String> = report
            .type_composition
            .iter()
            .map(|(kind, count)| format!("{kind}={count}"))
            .collect();
        out.push_str(&format!("Column types: {}\n", composition.join(", ")));

        for issue in &quality.issues {
            out.push_str(&format!("  ! {issue}\n"));
        }

        out.push_str("\nInsights:\n");
        for insight in &report.insights {
            let marker = match insight.severity {
                InsightSeverity::Alert => "ALERT",
                InsightSeverity::General => "info",
            };
            out.push_str(&format!("  [{marker}] {}: {}\n", insight.title, insight.message));
            if let Some(recommendation) = &insight.recommendation {
                out.push_str(&format!("          -> {recommendation}\n"));
            }
        }

        if !report.correlation.strong.is_empty() {
            out.push_str("\nStrong correlations:\n");
            for entry in &report.correlation.strong {
                out.push_str(&format!("  {} ~ {}: {:.3}\n", entry.col1, entry.col2, entry.pearson));
            }
        }

        let group_effects: Vec<String> = report
            .relationships
            .iter()
            .filter_map(|rel| match rel {
                RelationshipEntry::CategoricalNumericRelationship {
                    categorical,
                    numeric,
                    variation,
                    ..
                } => Some(format!("  {numeric} varies by {categorical} (cv {variation:.2})")),
                RelationshipEntry::StrongCorrelation { .. } => None,
            })
            .collect();
        if !group_effects.is_empty() {
            out.push_str("\nGroup differences:\n");
            for line in group_effects {
                out.push_str(&line);
                out.push('\n');
            }
        }

        let flagged: Vec<String> = report
            .anomalies
            .iter()
            .filter(|a| !a.indices.is_empty())
            .map(|a| format!("{} ({})", a.column, a.indices.len()))
            .collect();
        if !flagged.is_empty() {
            out.push_str(&format!("\nAnomalous values: {}\n", flagged.join(", ")));
        }

        if !report.visualizations.is_empty() {
            let charts: Vec<&str> = report.visualizations.iter().map(|v| v.as_str()).collect();
            out.push_str(&format!("\nSuggested charts: {}\n", charts.join(", ")));
        }

        let validation = &report.validation;
        for issue in &validation.issues {
            out.push_str(&format!("Validation issue: {issue}\n"));
        }
        for warning in &validation.warnings {
            out.push_str(&format!("Validation warning: {warning}\n"));
        }

        out
    }
}

use crate::table::ColumnKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Column Profiles
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    /// Distinct non-null values.
    pub unique: usize,
    /// Null cells.
    pub missing: usize,
    /// `missing / rows`, 0 for an empty table.
    pub missing_percent: f64,
    /// Present only for numeric columns with at least one non-null value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    /// Shannon entropy in bits, text columns only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
}

/// Numeric statistics of one column. A field is absent when its value is not
/// finite (overflowing sums, infinite cells), so the summary always survives a
/// JSON round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation; absent for a single value.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
}

// ============================================================================
// Distributions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionShape {
    Normal,
    RightSkewed,
    LeftSkewed,
    Other,
    InsufficientData,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionResult {
    pub column: String,
    #[serde(rename = "type")]
    pub shape: DistributionShape,
    pub skewness: f64,
    pub kurtosis: f64,
}

// ============================================================================
// Anomalies
// ============================================================================

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyMethod {
    /// `|z| > threshold` against mean and sample standard deviation.
    #[default]
    ZScore,
    /// Outside `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`.
    Iqr,
}

impl AnomalyMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AnomalyMethod::ZScore => "zscore",
            AnomalyMethod::Iqr => "iqr",
        }
    }
}

impl fmt::Display for AnomalyMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnomalyMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zscore" | "z-score" | "z_score" => Ok(AnomalyMethod::ZScore),
            "iqr" => Ok(AnomalyMethod::Iqr),
            other => Err(format!("unknown anomaly method '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyResult {
    pub column: String,
    pub method: AnomalyMethod,
    /// 0-based row positions in the original table.
    pub indices: Vec<usize>,
}

// ============================================================================
// Correlations & Relationships
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub col1: String,
    pub col2: String,
    pub pearson: f64,
}

impl CorrelationEntry {
    pub fn is_strong(&self, threshold: f64) -> bool {
        self.pearson.abs() > threshold
    }
}

/// Square Pearson matrix over the numeric columns. `None` marks an undefined cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient for a named pair, `None` if undefined or unknown.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    /// Pairs with `|r|` above the configured threshold, in matrix order.
    #[serde(rename = "correlations")]
    pub strong: Vec<CorrelationEntry>,
    pub matrix: CorrelationMatrix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationshipEntry {
    StrongCorrelation {
        columns: [String; 2],
        strength: f64,
    },
    CategoricalNumericRelationship {
        categorical: String,
        numeric: String,
        #[serde(rename = "strength")]
        strength_label: String,
        /// Coefficient of variation of the per-group means.
        variation: f64,
    },
}

// ============================================================================
// Quality & Validation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub quality_score: f64,
    pub missing_count: usize,
    pub duplicate_count: usize,
    pub completeness: f64,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

// ============================================================================
// Insights & Suggestions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Alert,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    #[serde(rename = "type")]
    pub severity: InsightSeverity,
    pub title: String,
    pub message: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationKind {
    Histogram,
    BoxPlot,
    BarChart,
    PieChart,
    ScatterPlot,
    LineChart,
    GroupedBarChart,
    Heatmap,
    #[serde(rename = "3d_scatter")]
    Scatter3d,
}

impl VisualizationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VisualizationKind::Histogram => "histogram",
            VisualizationKind::BoxPlot => "box_plot",
            VisualizationKind::BarChart => "bar_chart",
            VisualizationKind::PieChart => "pie_chart",
            VisualizationKind::ScatterPlot => "scatter_plot",
            VisualizationKind::LineChart => "line_chart",
            VisualizationKind::GroupedBarChart => "grouped_bar_chart",
            VisualizationKind::Heatmap => "heatmap",
            VisualizationKind::Scatter3d => "3d_scatter",
        }
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(rename = "filename")]
    pub source_name: String,
    pub rows: usize,
    pub columns: usize,
    /// RFC 3339 timestamp of report generation.
    #[serde(rename = "uploaded_at")]
    pub generated_at: String,
    pub duration_ms: u64,
}

/// Complete analysis of one table. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    #[serde(rename = "analysis")]
    pub columns: Vec<ColumnProfile>,
    pub type_composition: BTreeMap<ColumnKind, usize>,
    pub insights: Vec<InsightItem>,
    pub data_quality: QualityAssessment,
    pub correlation: CorrelationAnalysis,
    pub pairwise_correlations: Vec<CorrelationEntry>,
    pub relationships: Vec<RelationshipEntry>,
    pub distributions: Vec<DistributionResult>,
    pub anomalies: Vec<AnomalyResult>,
    pub visualizations: BTreeSet<VisualizationKind>,
    pub validation: ValidationReport,
}

impl AnalysisReport {
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn insight(&self, title: &str) -> Option<&InsightItem> {
        self.insights.iter().find(|i| i.title == title)
    }
}

static_assertions::assert_impl_all!(AnalysisReport: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anomaly_method_from_str() {
        assert_eq!("zscore".parse::<AnomalyMethod>(), Ok(AnomalyMethod::ZScore));
        assert_eq!("IQR".parse::<AnomalyMethod>(), Ok(AnomalyMethod::Iqr));
        assert!("mad".parse::<AnomalyMethod>().is_err());
    }

    #[test]
    fn test_relationship_serialization_is_tagged() {
        let entry = RelationshipEntry::CategoricalNumericRelationship {
            categorical: "region".to_string(),
            numeric: "sales".to_string(),
            strength_label: "moderate".to_string(),
            variation: 0.5,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], json!("categorical_numeric_relationship"));
        assert_eq!(value["strength"], json!("moderate"));

        let entry = RelationshipEntry::StrongCorrelation {
            columns: ["a".to_string(), "b".to_string()],
            strength: 0.9,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], json!("strong_correlation"));
        assert_eq!(value["columns"], json!(["a", "b"]));
    }

    #[test]
    fn test_insight_skips_absent_fields() {
        let item = InsightItem {
            severity: InsightSeverity::General,
            title: "t".to_string(),
            message: "m".to_string(),
            description: "d".to_string(),
            recommendation: None,
            metrics: None,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], json!("general"));
        assert!(value.get("recommendation").is_none());
        assert!(value.get("metrics").is_none());
    }

    #[test]
    fn test_visualization_kind_names() {
        assert_eq!(
            serde_json::to_string(&VisualizationKind::Scatter3d).unwrap(),
            "\"3d_scatter\""
        );
        assert_eq!(
            serde_json::to_string(&VisualizationKind::GroupedBarChart).unwrap(),
            "\"grouped_bar_chart\""
        );
    }

    #[test]
    fn test_numeric_summary_percentile_keys() {
        let summary = NumericSummary {
            mean: Some(1.0),
            median: Some(1.0),
            std: None,
            min: Some(1.0),
            max: Some(1.0),
            p25: Some(1.0),
            p75: Some(1.0),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("25%").is_some());
        assert!(value.get("75%").is_some());
    }

    #[test]
    fn test_correlation_matrix_lookup() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
        };
        assert_eq!(matrix.get("a", "a"), Some(1.0));
        assert_eq!(matrix.get("a", "b"), None);
        assert_eq!(matrix.get("a", "zzz"), None);
    }
}

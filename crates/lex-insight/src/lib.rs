//! Tabular Analysis & Insight Library
//!
//! Automatic first-look analysis of tabular datasets, built with Rust and Polars.
//!
//! # Overview
//!
//! Given a [`Table`] the engine produces one immutable [`AnalysisReport`] containing:
//!
//! - **Column Profiles**: unique/missing counts, numeric summaries, text entropy
//! - **Data Quality**: weighted quality score, completeness, duplicate rows
//! - **Correlations**: Pearson matrix, strong pairs, ranked pairwise list
//! - **Relationships**: strong correlations and category-driven numeric variation
//! - **Distributions**: skewness/kurtosis shape classification
//! - **Anomalies**: z-score or IQR flagged row indices
//! - **Insights**: ordered narrative alerts and summaries
//! - **Visualizations**: chart kinds suited to the column composition
//! - **Validation**: structural issues and warnings
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_insight::{AnalysisConfig, analyze, loader};
//!
//! let table = loader::load_csv("sales.csv")?;
//! let config = AnalysisConfig::builder()
//!     .source_name("sales.csv")
//!     .correlation_threshold(0.8)
//!     .build()?;
//!
//! let report = analyze(&table, &config)?;
//! for insight in &report.insights {
//!     println!("{}: {}", insight.title, insight.message);
//! }
//! ```
//!
//! # Persistence
//!
//! Reports can be kept in any [`ReportStore`]. Stores are explicit handles; the
//! analysis core never touches one.
//!
//! ```rust,ignore
//! use lex_insight::{JsonFileStore, ReportStore};
//!
//! let store = JsonFileStore::open("./reports")?;
//! let id = store.save(&report)?;
//! let latest = store.list(10, 0)?;
//! store.close();
//! ```

pub mod config;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod loader;
pub mod outliers;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod store;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use correlation::{CorrelationAnalyzer, RelationshipDetector};
pub use engine::{InsightEngine, analyze};
pub use error::{InsightError, Result as InsightResult, ResultExt};
pub use outliers::AnomalyDetector;
pub use profiler::{DataProfiler, DistributionClassifier};
pub use quality::{DataQualityAssessor, TableValidator};
pub use reporting::{InsightGenerator, ReportGenerator, VisualizationSuggester};
pub use store::{JsonFileStore, MemoryStore, ReportStore, StoreStats, StoredReport};
pub use table::{Column, ColumnData, ColumnKind, Table};
pub use types::{
    AnalysisReport, AnomalyMethod, AnomalyResult, ColumnProfile, CorrelationAnalysis,
    CorrelationEntry, CorrelationMatrix, DistributionResult, DistributionShape, InsightItem,
    InsightSeverity, NumericSummary, QualityAssessment, RelationshipEntry, ReportMetadata,
    ValidationReport, VisualizationKind,
};

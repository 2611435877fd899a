//! Report assembly and output.
//!
//! This module turns computed statistics into the narrative parts of an
//! [`AnalysisReport`](crate::types::AnalysisReport) and moves finished reports
//! out of the process:
//! - [`InsightGenerator`] builds the ordered insight list
//! - [`VisualizationSuggester`] picks chart types from the column composition
//! - [`ReportGenerator`] writes reports as JSON (`--emit-report`) and renders
//!   the terminal summary
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_insight::reporting::ReportGenerator;
//!
//! let report = lex_insight::analyze(&table, &config)?;
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new("output");
//! generator.write_report_to_file(&report, "sales")?;
//! ```

mod generator;
mod insights;
mod visualization;

pub use generator::ReportGenerator;
pub use insights::{COMPLETENESS_TITLE, DUPLICATE_ROWS_TITLE, InsightGenerator, MISSING_DATA_TITLE};
pub use visualization::VisualizationSuggester;

//! Correlation and relationship discovery between columns.
//!
//! - [`CorrelationAnalyzer`] builds the Pearson matrix over numeric columns and
//!   derives the strong-pair list and the ranked pairwise export.
//! - [`RelationshipDetector`] reports strong correlations plus categorical
//!   columns whose groups differ noticeably in a numeric column's mean.

mod analyzer;
mod relationships;

pub use analyzer::{CorrelationAnalyzer, pearson};
pub use relationships::RelationshipDetector;

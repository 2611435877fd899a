//! Data quality module.
//!
//! This module scores a table's completeness and duplication, and validates
//! its structure before analysis (entirely-null columns, constant columns,
//! high-cardinality text).

mod assessor;
mod validator;

pub use assessor::DataQualityAssessor;
pub use validator::TableValidator;

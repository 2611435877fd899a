use crate::table::Table;
use crate::types::ValidationReport;

/// Text columns whose distinct/row ratio exceeds this are flagged.
const HIGH_CARDINALITY_RATIO: f64 = 0.9;

/// More columns than this are hard to analyze.
const MAX_COMPREHENSIBLE_COLUMNS: usize = 100;

/// Structural checks run before analysis.
///
/// Issues make the table invalid; warnings are informational.
pub struct TableValidator;

impl TableValidator {
    pub fn validate(table: &Table) -> ValidationReport {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();
        let rows = table.row_count();

        if rows == 0 || table.column_count() == 0 {
            issues.push("Empty dataframe".to_string());
        }

        if rows > 0 {
            for column in table.columns() {
                if column.null_count() == rows {
                    issues.push(format!("Column \"{}\" is entirely null", column.name()));
                }
            }

            for column in table.categorical_columns() {
                let unique_ratio = column.distinct_count() as f64 / rows as f64;
                if unique_ratio > HIGH_CARDINALITY_RATIO {
                    warnings.push(format!(
                        "Column \"{}\" has very high cardinality ({:.1}%)",
                        column.name(),
                        unique_ratio * 100.0
                    ));
                }
            }
        }

        if table.column_count() > MAX_COMPREHENSIBLE_COLUMNS {
            warnings.push(format!(
                "Dataset has {} columns, which may be difficult to analyze",
                table.column_count()
            ));
        }

        for column in table.columns() {
            if column.distinct_count() == 1 {
                warnings.push(format!("Column \"{}\" has only one unique value", column.name()));
            }
        }

        ValidationReport {
            is_valid: issues.is_empty(),
            issues,
            warnings,
        }
    }
}

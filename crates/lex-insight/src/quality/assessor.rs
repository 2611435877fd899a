use crate::table::Table;
use crate::types::QualityAssessment;
use crate::utils::format_thousands;
use std::collections::HashSet;

/// More columns than this suggests dimensionality reduction.
const MANY_COLUMNS: usize = 50;

/// Fewer rows than this limits the analysis.
const FEW_ROWS: usize = 10;

/// Weight of the duplicate-row ratio in the quality score.
const DUPLICATE_PENALTY: f64 = 0.1;

pub struct DataQualityAssessor;

impl DataQualityAssessor {
    pub fn assess(table: &Table) -> QualityAssessment {
        let rows = table.row_count();
        let total_cells = table.cell_count();
        let missing_count = table.null_count();
        let duplicate_count = Self::duplicate_rows(table);

        let missing_ratio = ratio(missing_count, total_cells);
        let duplicate_ratio = ratio(duplicate_count, rows);

        let quality_score = (1.0 - missing_ratio - DUPLICATE_PENALTY * duplicate_ratio).clamp(0.0, 1.0);
        let completeness = (1.0 - missing_ratio).clamp(0.0, 1.0);

        let mut issues = Vec::new();
        if missing_count > 0 {
            issues.push(format!(
                "Contains {} missing values",
                format_thousands(missing_count)
            ));
        }
        if duplicate_count > 0 {
            issues.push(format!(
                "Contains {} duplicate rows",
                format_thousands(duplicate_count)
            ));
        }
        if table.column_count() > MANY_COLUMNS {
            issues.push("Dataset has many columns, consider dimensionality reduction".to_string());
        }
        if rows < FEW_ROWS {
            issues.push("Dataset is very small, analysis may be limited".to_string());
        }

        QualityAssessment {
            quality_score,
            missing_count,
            duplicate_count,
            completeness,
            issues,
        }
    }

    /// Rows equal in every column to some earlier row.
    pub fn duplicate_rows(table: &Table) -> usize {
        let mut seen = HashSet::with_capacity(table.row_count());
        (0..table.row_count())
            .filter(|&row| !seen.insert(table.row_key(row)))
            .count()
    }
}

/// `part / whole`, or 0 when `whole` is 0.
fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn clean_table(rows: i64) -> Table {
        Table::new(vec![
            Column::integer("id", (0..rows).map(Some)),
            Column::decimal("value", (0..rows).map(|i| Some(i as f64 * 1.5))),
        ])
        .unwrap()
    }

    #[test]
    fn test_clean_table_scores_one() {
        let assessment = DataQualityAssessor::assess(&clean_table(20));
        assert_eq!(assessment.quality_score, 1.0);
        assert_eq!(assessment.completeness, 1.0);
        assert_eq!(assessment.missing_count, 0);
        assert_eq!(assessment.duplicate_count, 0);
        assert!(assessment.issues.is_empty());
    }

    #[test]
    fn test_small_table_issue() {
        let assessment = DataQualityAssessor::assess(&clean_table(3));
        assert_eq!(
            assessment.issues,
            vec!["Dataset is very small, analysis may be limited".to_string()]
        );
    }

    #[test]
    fn test_missing_and_duplicates() {
        // 10 rows x 2 columns, 2 nulls, rows 1 and 2 repeat row 0
        let mut ids = vec![Some(1), Some(1), Some(1)];
        ids.extend((4..=10).map(Some));
        let mut labels = vec![Some("a"), Some("a"), Some("a")];
        labels.extend(std::iter::repeat_n(None::<&str>, 2));
        labels.extend(std::iter::repeat_n(Some("b"), 5));
        let table = Table::new(vec![Column::integer("id", ids), Column::text("label", labels)]).unwrap();

        let assessment = DataQualityAssessor::assess(&table);
        assert_eq!(assessment.missing_count, 2);
        assert_eq!(assessment.duplicate_count, 2);
        assert!((assessment.completeness - 0.9).abs() < 1e-12);
        // 1 - 2/20 - 0.1 * 2/10
        assert!((assessment.quality_score - 0.88).abs() < 1e-12);
        assert_eq!(
            assessment.issues,
            vec![
                "Contains 2 missing values".to_string(),
                "Contains 2 duplicate rows".to_string(),
            ]
        );
    }

    #[test]
    fn test_null_rows_count_as_duplicates() {
        let table = Table::new(vec![Column::integer("a", [None, None, Some(1)])]).unwrap();
        assert_eq!(DataQualityAssessor::duplicate_rows(&table), 1);
    }

    #[test]
    fn test_many_columns_issue() {
        let columns = (0..51)
            .map(|i| Column::integer(format!("c{i}"), (0..12).map(|r| Some(r * i))))
            .collect();
        let table = Table::new(columns).unwrap();
        let assessment = DataQualityAssessor::assess(&table);
        assert!(
            assessment
                .issues
                .contains(&"Dataset has many columns, consider dimensionality reduction".to_string())
        );
    }

    #[test]
    fn test_score_never_negative() {
        let table = Table::new(vec![Column::integer("a", [None, None, None])]).unwrap();
        let assessment = DataQualityAssessor::assess(&table);
        assert_eq!(assessment.completeness, 0.0);
        assert!(assessment.quality_score >= 0.0);
    }

    #[test]
    fn test_score_monotone_in_missing_then_duplicates() {
        fn assess(ids: &[Option<i64>], values: &[Option<f64>]) -> QualityAssessment {
            let table = Table::new(vec![
                Column::integer("id", ids.to_vec()),
                Column::decimal("value", values.to_vec()),
            ])
            .unwrap();
            DataQualityAssessor::assess(&table)
        }

        let mut ids: Vec<Option<i64>> = (0..12).map(Some).collect();
        let mut values: Vec<Option<f64>> = (0..12).map(|i| Some(i as f64 * 2.5)).collect();
        let mut previous = assess(&ids, &values);
        assert_eq!(previous.quality_score, 1.0);

        let mut step = |ids: &[Option<i64>], values: &[Option<f64>]| {
            let current = assess(ids, values);
            assert!(current.quality_score <= previous.quality_score);
            assert!((0.0..=1.0).contains(&current.quality_score));
            assert!(current.missing_count >= previous.missing_count);
            assert!(current.duplicate_count >= previous.duplicate_count);
            previous = current;
        };

        // One more null per step
        for row in 0..6 {
            values[row] = None;
            step(&ids, &values);
        }
        // Then one more copy of row 0 per step
        for row in (8..12).rev() {
            ids[row] = ids[0];
            values[row] = values[0];
            step(&ids, &values);
        }

        let last = assess(&ids, &values);
        assert_eq!(last.missing_count, 10);
        assert_eq!(last.duplicate_count, 4);
        // 1 - 10/24 - 0.1 * 4/12
        assert!((last.quality_score - (1.0 - 10.0 / 24.0 - 0.4 / 12.0)).abs() < 1e-12);
    }
}

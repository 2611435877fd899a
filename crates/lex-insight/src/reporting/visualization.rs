//! Chart suggestions from the column-kind composition.

use crate::table::Table;
use crate::types::VisualizationKind;
use std::collections::BTreeSet;

pub struct VisualizationSuggester;

impl VisualizationSuggester {
    pub fn suggest(table: &Table) -> BTreeSet<VisualizationKind> {
        Self::suggest_for(table.numeric_columns().len(), table.categorical_columns().len())
    }

    /// Suggestions for a table with the given numeric and categorical column counts.
    pub fn suggest_for(numeric: usize, categorical: usize) -> BTreeSet<VisualizationKind> {
        use VisualizationKind::*;

        let mut kinds = BTreeSet::new();
        if numeric > 0 {
            kinds.extend([Histogram, BoxPlot]);
        }
        if categorical > 0 {
            kinds.extend([BarChart, PieChart]);
        }
        if numeric >= 2 {
            kinds.extend([ScatterPlot, LineChart]);
            if categorical > 0 {
                kinds.insert(GroupedBarChart);
            }
        }
        if numeric > 2 {
            kinds.extend([Heatmap, Scatter3d]);
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VisualizationKind::*;

    #[test]
    fn test_nothing_to_chart() {
        assert!(VisualizationSuggester::suggest_for(0, 0).is_empty());
    }

    #[test]
    fn test_single_numeric() {
        let kinds = VisualizationSuggester::suggest_for(1, 0);
        assert_eq!(kinds, BTreeSet::from([Histogram, BoxPlot]));
    }

    #[test]
    fn test_categorical_only() {
        let kinds = VisualizationSuggester::suggest_for(0, 3);
        assert_eq!(kinds, BTreeSet::from([BarChart, PieChart]));
    }

    #[test]
    fn test_two_numeric_one_categorical() {
        let kinds = VisualizationSuggester::suggest_for(2, 1);
        assert!(kinds.contains(&GroupedBarChart));
        assert!(kinds.contains(&ScatterPlot));
        assert!(!kinds.contains(&Heatmap));
    }

    #[test]
    fn test_three_numeric() {
        let kinds = VisualizationSuggester::suggest_for(3, 0);
        assert!(kinds.contains(&Heatmap));
        assert!(kinds.contains(&Scatter3d));
        assert!(!kinds.contains(&GroupedBarChart));
        assert_eq!(kinds.len(), 6);
    }
}

use super::{ReportStore, StoreStats, StoredReport};
use crate::error::{InsightError, Result};
use crate::types::AnalysisReport;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-process store for tests and embedding. Nothing outlives the value.
#[derive(Default)]
pub struct MemoryStore {
    reports: RwLock<HashMap<String, StoredReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

impl ReportStore for MemoryStore {
    fn save(&self, report: &AnalysisReport) -> Result<String> {
        let stored = StoredReport::new(report.clone());
        let id = stored.id.clone();
        self.reports.write().insert(id.clone(), stored);
        Ok(id)
    }

    fn get(&self, id: &str) -> Result<StoredReport> {
        self.reports
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| InsightError::ReportNotFound(id.to_string()))
    }

    fn list(&self, limit: usize, skip: usize) -> Result<Vec<StoredReport>> {
        let reports = self.reports.read();
        let mut ids: Vec<&String> = reports.keys().collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        Ok(ids
            .into_iter()
            .skip(skip)
            .take(limit)
            .filter_map(|id| reports.get(id).cloned())
            .collect())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.reports
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| InsightError::ReportNotFound(id.to_string()))
    }

    fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats::from_reports(self.reports.read().values()))
    }
}

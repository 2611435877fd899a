//! Report persistence.
//!
//! Stores are explicit handles passed to whoever needs them; the analysis core
//! never sees one. Two implementations share the [`ReportStore`] trait:
//!
//! - [`JsonFileStore`]: one pretty-printed JSON file per report in a directory,
//!   with an explicit [`open`](JsonFileStore::open) / [`close`](JsonFileStore::close)
//!   lifecycle
//! - [`MemoryStore`]: a `parking_lot::RwLock<HashMap>` for tests and embedding
//!
//! Listing is newest first. Identifiers are opaque strings that sort in
//! creation order.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::types::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-local counter keeping ids unique within one clock tick.
static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A persisted report with its store metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub report: AnalysisReport,
}

impl StoredReport {
    /// Wrap a report under a fresh identifier.
    pub fn new(report: AnalysisReport) -> Self {
        Self {
            id: generate_report_id(),
            created_at: Utc::now(),
            report,
        }
    }
}

/// Aggregate figures over everything in a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_reports: usize,
    pub total_rows_analyzed: usize,
    /// Mean quality score, 0 for an empty store.
    pub average_quality_score: f64,
    pub latest_report_at: Option<DateTime<Utc>>,
}

impl StoreStats {
    pub(crate) fn from_reports<'a>(reports: impl IntoIterator<Item = &'a StoredReport>) -> Self {
        let mut stats = StoreStats::default();
        let mut score_sum = 0.0;
        for stored in reports {
            stats.total_reports += 1;
            stats.total_rows_analyzed += stored.report.metadata.rows;
            score_sum += stored.report.data_quality.quality_score;
            if stats.latest_report_at.is_none_or(|latest| stored.created_at > latest) {
                stats.latest_report_at = Some(stored.created_at);
            }
        }
        if stats.total_reports > 0 {
            stats.average_quality_score = score_sum / stats.total_reports as f64;
        }
        stats
    }
}

/// Persistence operations for analysis reports.
pub trait ReportStore: Send + Sync {
    /// Persist a report and return its new identifier.
    fn save(&self, report: &AnalysisReport) -> Result<String>;

    /// Fetch one report. [`ReportNotFound`](crate::InsightError::ReportNotFound)
    /// if the id is unknown.
    fn get(&self, id: &str) -> Result<StoredReport>;

    /// Up to `limit` reports, newest first, after skipping `skip`.
    fn list(&self, limit: usize, skip: usize) -> Result<Vec<StoredReport>>;

    /// Remove one report. [`ReportNotFound`](crate::InsightError::ReportNotFound)
    /// if the id is unknown.
    fn delete(&self, id: &str) -> Result<()>;

    fn stats(&self) -> Result<StoreStats>;
}

static_assertions::assert_impl_all!(JsonFileStore: Send, Sync);
static_assertions::assert_impl_all!(MemoryStore: Send, Sync);

/// Fresh identifier: nanosecond timestamp plus a process-local sequence, both
/// zero-padded so ids sort in creation order.
pub fn generate_report_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let sequence = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("report_{timestamp:020}_{sequence:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_ids_are_unique_and_ordered() {
        let ids: Vec<String> = (0..50).map(|_| generate_report_id()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
        assert_eq!(sorted, ids);
        assert!(ids[0].starts_with("report_"));
    }
}

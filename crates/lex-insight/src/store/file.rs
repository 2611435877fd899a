use super::{ReportStore, StoreStats, StoredReport};
use crate::error::{InsightError, Result, ResultExt};
use crate::types::AnalysisReport;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const RECORD_EXTENSION: &str = "json";

/// Directory-backed store holding one pretty-printed JSON file per report.
///
/// The in-memory index maps id to record path and is `None` once the store is
/// closed. Every operation on a closed store returns
/// [`InsightError::StoreClosed`].
pub struct JsonFileStore {
    dir: PathBuf,
    index: RwLock<Option<BTreeMap<String, PathBuf>>>,
}

impl JsonFileStore {
    /// Open a store rooted at `dir`, creating the directory if needed and
    /// indexing the records already present. Unreadable records are skipped.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context(format!("Creating {}", dir.display()))?;

        let mut index = BTreeMap::new();
        for entry in fs::read_dir(&dir).context(format!("Reading {}", dir.display()))? {
            let path = entry?.path();
            let is_record = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == RECORD_EXTENSION);
            if !is_record {
                continue;
            }
            match Self::read_record(&path) {
                Ok(stored) => {
                    index.insert(stored.id, path);
                }
                Err(e) => warn!("Skipping unreadable report {}: {}", path.display(), e),
            }
        }

        info!("Opened report store at {} ({} reports)", dir.display(), index.len());
        Ok(Self {
            dir,
            index: RwLock::new(Some(index)),
        })
    }

    /// Release the index. Later operations fail with `StoreClosed`.
    pub fn close(&self) {
        if self.index.write().take().is_some() {
            debug!("Closed report store at {}", self.dir.display());
        }
    }

    pub fn is_open(&self) -> bool {
        self.index.read().is_some()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_record(path: &Path) -> Result<StoredReport> {
        let raw = fs::read_to_string(path).context(format!("Reading {}", path.display()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Paths for every indexed id, newest first.
    fn paths_newest_first(&self) -> Result<Vec<PathBuf>> {
        let guard = self.index.read();
        let index = guard.as_ref().ok_or(InsightError::StoreClosed)?;
        Ok(index.values().rev().cloned().collect())
    }
}

impl ReportStore for JsonFileStore {
    fn save(&self, report: &AnalysisReport) -> Result<String> {
        let stored = StoredReport::new(report.clone());
        let path = self.dir.join(format!("{}.{RECORD_EXTENSION}", stored.id));

        let mut guard = self.index.write();
        let index = guard.as_mut().ok_or(InsightError::StoreClosed)?;

        let mut file = File::create(&path).context(format!("Creating {}", path.display()))?;
        file.write_all(serde_json::to_string_pretty(&stored)?.as_bytes())?;
        index.insert(stored.id.clone(), path);

        debug!("Saved report {}", stored.id);
        Ok(stored.id)
    }

    fn get(&self, id: &str) -> Result<StoredReport> {
        let path = {
            let guard = self.index.read();
            let index = guard.as_ref().ok_or(InsightError::StoreClosed)?;
            index
                .get(id)
                .cloned()
                .ok_or_else(|| InsightError::ReportNotFound(id.to_string()))?
        };
        Self::read_record(&path)
    }

    fn list(&self, limit: usize, skip: usize) -> Result<Vec<StoredReport>> {
        self.paths_newest_first()?
            .iter()
            .skip(skip)
            .take(limit)
            .map(|path| Self::read_record(path))
            .collect()
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut guard = self.index.write();
        let index = guard.as_mut().ok_or(InsightError::StoreClosed)?;
        let path = index
            .remove(id)
            .ok_or_else(|| InsightError::ReportNotFound(id.to_string()))?;
        fs::remove_file(&path).context(format!("Removing {}", path.display()))?;
        debug!("Deleted report {}", id);
        Ok(())
    }

    fn stats(&self) -> Result<StoreStats> {
        let reports = self
            .paths_newest_first()?
            .iter()
            .map(|path| Self::read_record(path))
            .collect::<Result<Vec<_>>>()?;
        Ok(StoreStats::from_reports(&reports))
    }
}

use crate::adapters::store::memory::{InMemoryStore, Snapshot};
use crate::domain::{CommitSummary, Department, Officer, Prisoner, PrisonerDetails, Store};
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// In-memory store persisted as a JSON snapshot file, rewritten after every
/// successful commit.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: InMemoryStore,
}

impl JsonFileStore {
    /// 開啟快照檔；檔案不存在時從空白資料開始
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            tracing::debug!(
                "Loaded snapshot {} ({} departments, {} prisoners, {} officers)",
                path.display(),
                snapshot.departments.len(),
                snapshot.prisoners.len(),
                snapshot.officers.len()
            );
            snapshot
        } else {
            tracing::debug!("No snapshot at {}, starting empty", path.display());
            Snapshot::default()
        };

        Ok(Self {
            path,
            inner: InMemoryStore::from_snapshot(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self.inner.snapshot())?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, data)?;
        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn add_departments(&mut self, departments: Vec<Department>) {
        self.inner.add_departments(departments);
    }

    fn add_prisoners(&mut self, prisoners: Vec<Prisoner>) {
        self.inner.add_prisoners(prisoners);
    }

    fn add_officers(&mut self, officers: Vec<Officer>) {
        self.inner.add_officers(officers);
    }

    fn commit(&mut self) -> Result<CommitSummary> {
        let summary = self.inner.commit()?;
        if !summary.is_empty() {
            self.write_snapshot()?;
            tracing::debug!("Snapshot written to {}", self.path.display());
        }
        Ok(summary)
    }

    fn departments(&self) -> &[Department] {
        self.inner.departments()
    }

    fn prisoners(&self) -> &[Prisoner] {
        self.inner.prisoners()
    }

    fn officers(&self) -> &[Officer] {
        self.inner.officers()
    }

    fn prisoners_matching<'a>(
        &'a self,
        predicate: &dyn Fn(&Prisoner) -> bool,
    ) -> Result<Vec<PrisonerDetails<'a>>> {
        self.inner.prisoners_matching(predicate)
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        if self.inner.has_staged() {
            tracing::warn!(
                "Store {} dropped with uncommitted changes; they were not written",
                self.path.display()
            );
        }
    }
}

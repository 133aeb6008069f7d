use crate::error::Result;
use crate::model::{Client, Project};
use std::fs::File;
use std::path::PathBuf;

/// Abstract interface for raw table I/O.
/// This trait handles the "how" of storage (CSV files vs memory),
/// while RecordStore handles the "what" (keys, uniqueness, reassignment).
pub trait TableBackend {
    /// Load every client row in file order.
    /// Returns an empty table when the file does not exist yet.
    fn load_clients(&self) -> Result<Vec<Client>>;

    /// Rewrite the whole clients table.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn save_clients(&self, clients: &[Client]) -> Result<()>;

    /// Load every project row in file order.
    fn load_projects(&self) -> Result<Vec<Project>>;

    /// Rewrite the whole projects table. Same atomicity rule as `save_clients`.
    fn save_projects(&self, projects: &[Project]) -> Result<()>;

    /// Acquire the write lock for one read-modify-write cycle.
    /// Released when the returned guard is dropped.
    fn lock(&self) -> Result<WriteLock>;

    /// Where the table lives. Virtual for non-file backends.
    fn table_path(&self, table: super::Table) -> PathBuf;
}

/// Guard for the advisory write lock.
///
/// Holds the locked file handle; the OS releases the lock when the handle is
/// closed on drop.
#[derive(Debug)]
pub struct WriteLock {
    file: Option<File>,
}

impl WriteLock {
    pub(crate) fn held(file: File) -> Self {
        Self { file: Some(file) }
    }

    /// A guard that locks nothing, for backends with a single in-process owner.
    pub fn noop() -> Self {
        Self { file: None }
    }

    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }
}

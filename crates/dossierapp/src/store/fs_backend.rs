use super::backend::{TableBackend, WriteLock};
use super::Table;
use crate::error::{DossierError, Result};
use crate::model::{Client, ClientRow, Project, ProjectRow, CLIENT_COLUMNS, PROJECT_COLUMNS};
use csv::{ReaderBuilder, WriterBuilder};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const LOCK_FILE: &str = ".dossier.lock";

pub struct FsBackend {
    data_dir: PathBuf,
    locking: bool,
}

impl FsBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            locking: true,
        }
    }

    /// Turn the advisory lock off (e.g. on filesystems without `flock`).
    pub fn with_locking(mut self, locking: bool) -> Self {
        self.locking = locking;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(DossierError::Io)?;
        }
        Ok(())
    }

    /// Reads a table as `(line, row)` pairs. `None` when the file is absent.
    fn read_rows<R: DeserializeOwned>(&self, table: Table) -> Result<Option<Vec<(u64, R)>>> {
        let path = self.table_path(table);
        if !path.exists() {
            return Ok(None);
        }

        let mut reader = ReaderBuilder::new().flexible(true).from_path(&path)?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let row: R = record
                .deserialize(Some(&headers))
                .map_err(|e| DossierError::InvalidRow {
                    table,
                    line,
                    detail: e.to_string(),
                })?;
            rows.push((line, row));
        }

        tracing::debug!(table = %table, rows = rows.len(), path = %path.display(), "loaded table");
        Ok(Some(rows))
    }

    fn write_rows<R: Serialize>(&self, table: Table, columns: &[&str], rows: &[R]) -> Result<()> {
        self.ensure_dir(&self.data_dir)?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(columns)?;
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| DossierError::Io(e.into_error()))?;

        // Atomic write: tmp file in the same directory, then rename over the table
        let target = self.table_path(table);
        let tmp = self
            .data_dir
            .join(format!(".{}-{}.tmp", table.file_name(), Uuid::new_v4()));
        fs::write(&tmp, bytes).map_err(DossierError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(DossierError::Io(e));
        }

        tracing::info!(table = %table, rows = rows.len(), path = %target.display(), "saved table");
        Ok(())
    }
}

impl TableBackend for FsBackend {
    fn load_clients(&self) -> Result<Vec<Client>> {
        let rows: Vec<(u64, ClientRow)> = self.read_rows(Table::Clients)?.unwrap_or_default();
        rows.into_iter()
            .map(|(line, row)| row.into_client(line))
            .collect()
    }

    fn save_clients(&self, clients: &[Client]) -> Result<()> {
        let rows: Vec<ClientRow> = clients.iter().map(ClientRow::from).collect();
        self.write_rows(Table::Clients, &CLIENT_COLUMNS, &rows)
    }

    fn load_projects(&self) -> Result<Vec<Project>> {
        let rows: Vec<(u64, ProjectRow)> = self.read_rows(Table::Projects)?.unwrap_or_default();
        rows.into_iter()
            .map(|(line, row)| row.into_project(line))
            .collect()
    }

    fn save_projects(&self, projects: &[Project]) -> Result<()> {
        let rows: Vec<ProjectRow> = projects.iter().map(ProjectRow::from).collect();
        self.write_rows(Table::Projects, &PROJECT_COLUMNS, &rows)
    }

    fn lock(&self) -> Result<WriteLock> {
        if !self.locking {
            return Ok(WriteLock::noop());
        }
        self.ensure_dir(&self.data_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.data_dir.join(LOCK_FILE))
            .map_err(DossierError::Io)?;
        FileExt::lock_exclusive(&file).map_err(DossierError::Io)?;
        Ok(WriteLock::held(file))
    }

    fn table_path(&self, table: Table) -> PathBuf {
        self.data_dir.join(table.file_name())
    }
}

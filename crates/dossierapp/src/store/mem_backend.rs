use super::backend::{TableBackend, WriteLock};
use super::Table;
use crate::error::{DossierError, Result};
use crate::model::{Client, Project};
use std::cell::RefCell;
use std::path::PathBuf;

/// In-memory table backend for testing.
///
/// Uses `RefCell` for interior mutability since the store is single-threaded.
/// This keeps the `TableBackend` trait on `&self` like the file backend.
#[derive(Default)]
pub struct MemBackend {
    clients: RefCell<Vec<Client>>,
    projects: RefCell<Vec<Project>>,
    simulate_write_error: RefCell<bool>,
    saves: RefCell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Number of successful table rewrites so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DossierError::Io(std::io::Error::other(
                "Simulated write error",
            )));
        }
        Ok(())
    }
}

impl TableBackend for MemBackend {
    fn load_clients(&self) -> Result<Vec<Client>> {
        Ok(self.clients.borrow().clone())
    }

    fn save_clients(&self, clients: &[Client]) -> Result<()> {
        self.check_writable()?;
        *self.clients.borrow_mut() = clients.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn load_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.borrow().clone())
    }

    fn save_projects(&self, projects: &[Project]) -> Result<()> {
        self.check_writable()?;
        *self.projects.borrow_mut() = projects.to_vec();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }

    fn lock(&self) -> Result<WriteLock> {
        Ok(WriteLock::noop())
    }

    fn table_path(&self, table: Table) -> PathBuf {
        PathBuf::from(format!("memory://{}", table.file_name()))
    }
}

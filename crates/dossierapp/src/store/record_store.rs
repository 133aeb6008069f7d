use super::backend::TableBackend;
use super::Table;
use crate::error::{DossierError, Result};
use crate::model::{Client, Project};

/// Keyed access to the two tables.
///
/// Every mutating call is one locked read-modify-write of a single table.
/// Cross-table rules (cascade, rename propagation) are composed by the
/// command layer from these primitives.
pub struct RecordStore<B: TableBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: TableBackend> RecordStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Reads ---

    pub fn load_clients(&self) -> Result<Vec<Client>> {
        self.backend.load_clients()
    }

    pub fn load_projects(&self) -> Result<Vec<Project>> {
        self.backend.load_projects()
    }

    pub fn get_client(&self, id: &str) -> Result<Client> {
        self.backend
            .load_clients()?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found(Table::Clients, id))
    }

    pub fn get_project(&self, order_code: &str) -> Result<Project> {
        self.backend
            .load_projects()?
            .into_iter()
            .find(|p| p.has_code(order_code))
            .ok_or_else(|| not_found(Table::Projects, order_code))
    }

    pub fn client_exists(&self, id: &str) -> Result<bool> {
        Ok(self.backend.load_clients()?.iter().any(|c| c.id == id))
    }

    /// Whether `order_code` collides with a project other than `except`.
    pub fn project_code_taken(&self, order_code: &str, except: Option<&str>) -> Result<bool> {
        Ok(self.backend.load_projects()?.iter().any(|p| {
            p.has_code(order_code) && except.map(|old| !p.has_code(old)).unwrap_or(true)
        }))
    }

    /// Projects whose `client_id` is `client_id`, in table order.
    pub fn projects_of(&self, client_id: &str) -> Result<Vec<Project>> {
        Ok(self
            .backend
            .load_projects()?
            .into_iter()
            .filter(|p| p.belongs_to(client_id))
            .collect())
    }

    // --- Writes ---

    pub fn append_client(&mut self, client: Client) -> Result<()> {
        let _lock = self.backend.lock()?;
        let mut clients = self.backend.load_clients()?;
        if clients.iter().any(|c| c.id == client.id) {
            return Err(duplicate(Table::Clients, &client.id));
        }
        tracing::debug!(client_id = %client.id, "appending client");
        clients.push(client);
        self.backend.save_clients(&clients)
    }

    pub fn append_project(&mut self, project: Project) -> Result<()> {
        let _lock = self.backend.lock()?;
        let mut projects = self.backend.load_projects()?;
        if projects.iter().any(|p| p.has_code(&project.order_code)) {
            return Err(duplicate(Table::Projects, &project.order_code));
        }
        tracing::debug!(order_code = %project.order_code, "appending project");
        projects.push(project);
        self.backend.save_projects(&projects)
    }

    /// Replaces every field of the row keyed `old_id`, the id included.
    /// Does not touch projects; see [`RecordStore::reassign_projects`].
    pub fn update_client(&mut self, old_id: &str, client: Client) -> Result<()> {
        let _lock = self.backend.lock()?;
        let mut clients = self.backend.load_clients()?;
        let pos = clients
            .iter()
            .position(|c| c.id == old_id)
            .ok_or_else(|| not_found(Table::Clients, old_id))?;
        if client.id != old_id && clients.iter().any(|c| c.id == client.id) {
            return Err(duplicate(Table::Clients, &client.id));
        }
        clients[pos] = client;
        self.backend.save_clients(&clients)
    }

    pub fn update_project(&mut self, old_code: &str, project: Project) -> Result<()> {
        let _lock = self.backend.lock()?;
        let mut projects = self.backend.load_projects()?;
        let pos = projects
            .iter()
            .position(|p| p.has_code(old_code))
            .ok_or_else(|| not_found(Table::Projects, old_code))?;
        let collides = projects
            .iter()
            .enumerate()
            .any(|(i, p)| i != pos && p.has_code(&project.order_code));
        if collides {
            return Err(duplicate(Table::Projects, &project.order_code));
        }
        projects[pos] = project;
        self.backend.save_projects(&projects)
    }

    /// Rewrites `client_id` from `old_id` to `new_id` on every project.
    /// Returns how many projects moved. Writes nothing when none did.
    pub fn reassign_projects(&mut self, old_id: &str, new_id: &str) -> Result<usize> {
        if old_id == new_id {
            return Ok(0);
        }
        let _lock = self.backend.lock()?;
        let mut projects = self.backend.load_projects()?;
        let mut moved = 0;
        for project in projects.iter_mut().filter(|p| p.belongs_to(old_id)) {
            project.client_id = new_id.to_string();
            moved += 1;
        }
        if moved > 0 {
            self.backend.save_projects(&projects)?;
            tracing::info!(from = %old_id, to = %new_id, moved, "reassigned projects");
        }
        Ok(moved)
    }

    /// Removes the client row only. Returns the removed record.
    pub fn delete_client(&mut self, id: &str) -> Result<Client> {
        let _lock = self.backend.lock()?;
        let mut clients = self.backend.load_clients()?;
        let pos = clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| not_found(Table::Clients, id))?;
        let removed = clients.remove(pos);
        self.backend.save_clients(&clients)?;
        Ok(removed)
    }

    pub fn delete_project(&mut self, order_code: &str) -> Result<Project> {
        let _lock = self.backend.lock()?;
        let mut projects = self.backend.load_projects()?;
        let pos = projects
            .iter()
            .position(|p| p.has_code(order_code))
            .ok_or_else(|| not_found(Table::Projects, order_code))?;
        let removed = projects.remove(pos);
        self.backend.save_projects(&projects)?;
        Ok(removed)
    }
}

fn not_found(table: Table, key: &str) -> DossierError {
    DossierError::NotFound {
        table,
        key: key.to_string(),
    }
}

fn duplicate(table: Table, key: &str) -> DossierError {
    DossierError::DuplicateKey {
        table,
        key: key.to_string(),
    }
}

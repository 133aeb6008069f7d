//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every dossier operation, whatever the front end.
//!
//! ## Role and Responsibilities
//!
//! - **Owns** the record store, the asset manager and the resolved paths
//! - **Dispatches** to the matching `commands::*` function
//! - **Applies settings** that commands take as arguments (the project sweep)
//!
//! It holds no business logic and does no terminal I/O.
//!
//! ## Generic Over TableBackend
//!
//! `DossierApi<B: TableBackend>`:
//! - Production: `DossierApi<FsBackend>`, built with [`DossierApi::open`]
//! - Testing: `DossierApi<MemBackend>`
//!
//! Image files always go to the real directories in [`DossierPaths`]; only
//! the tables are swapped.

use crate::assets::AssetManager;
use crate::commands::{
    self, ClientInput, ClientUpdate, CmdResult, DossierPaths, ProjectInput, ProjectUpdate,
};
use crate::config::DossierConfig;
use crate::error::Result;
use crate::model::{Client, Project};
use crate::store::backend::TableBackend;
use crate::store::fs_backend::FsBackend;
use crate::store::RecordStore;
use chrono::NaiveDate;
use std::path::Path;

pub struct DossierApi<B: TableBackend> {
    store: RecordStore<B>,
    assets: AssetManager,
    paths: DossierPaths,
    sweep_project_images: bool,
}

impl DossierApi<FsBackend> {
    /// CSV tables and image directories as configured, relative to `root`.
    pub fn open(config: &DossierConfig, root: &Path) -> Self {
        let paths = config.paths(root);
        let backend = FsBackend::new(&paths.data_dir).with_locking(config.lock);
        Self::new(RecordStore::with_backend(backend), paths)
            .with_project_sweep(config.sweep_project_images)
    }
}

impl<B: TableBackend> DossierApi<B> {
    pub fn new(store: RecordStore<B>, paths: DossierPaths) -> Self {
        Self {
            store,
            assets: paths.asset_manager(),
            paths,
            sweep_project_images: false,
        }
    }

    pub fn with_project_sweep(mut self, enabled: bool) -> Self {
        self.sweep_project_images = enabled;
        self
    }

    pub fn paths(&self) -> &DossierPaths {
        &self.paths
    }

    pub fn assets(&self) -> &AssetManager {
        &self.assets
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    pub fn client(&self, id: &str) -> Result<Client> {
        self.store.get_client(id.trim())
    }

    pub fn project(&self, order_code: &str) -> Result<Project> {
        self.store.get_project(order_code)
    }

    pub fn create_client(&mut self, input: ClientInput) -> Result<CmdResult> {
        commands::create::client(&mut self.store, &self.assets, input)
    }

    pub fn create_project(&mut self, input: ProjectInput) -> Result<CmdResult> {
        commands::create::project(&mut self.store, &self.assets, input)
    }

    pub fn client_profile(&self, id: &str) -> Result<CmdResult> {
        commands::view::client_profile(&self.store, &self.assets, id)
    }

    pub fn project_profile(&self, order_code: &str) -> Result<CmdResult> {
        commands::view::project_profile(&self.store, &self.assets, order_code)
    }

    pub fn client_projects(&self, id: &str) -> Result<CmdResult> {
        commands::view::client_projects(&self.store, id)
    }

    pub fn search(&self, query: &str) -> Result<CmdResult> {
        commands::search::run(&self.store, query)
    }

    pub fn birthdays(&self, on: NaiveDate) -> Result<CmdResult> {
        commands::search::birthdays(&self.store, on)
    }

    pub fn update_client(&mut self, old_id: &str, update: ClientUpdate) -> Result<CmdResult> {
        commands::update::client(&mut self.store, &self.assets, old_id, update)
    }

    pub fn update_project(&mut self, old_code: &str, update: ProjectUpdate) -> Result<CmdResult> {
        commands::update::project(&mut self.store, &self.assets, old_code, update)
    }

    pub fn delete_client(&mut self, id: &str) -> Result<CmdResult> {
        commands::delete::client(&mut self.store, id)
    }

    pub fn delete_project(&mut self, order_code: &str) -> Result<CmdResult> {
        commands::delete::project(&mut self.store, order_code)
    }

    /// Client images always; project images when asked or configured.
    pub fn sweep(&self, include_projects: bool) -> Result<CmdResult> {
        let include_projects = include_projects || self.sweep_project_images;
        commands::sweep::run(&self.store, &self.assets, include_projects)
    }

    pub fn init(&self) -> Result<CmdResult> {
        commands::init::run(&self.paths)
    }

    pub fn locations(&self) -> Result<CmdResult> {
        commands::paths::run(&self.paths)
    }
}

//! # Command Layer
//!
//! The business rules of dossier live here, one operation per submodule. The
//! store only knows single-table reads and writes; commands compose them into
//! the cross-table and cross-asset rules:
//!
//! - creating a record stores its uploads, then appends the row
//! - renaming a client moves its image and reassigns its projects
//! - deleting a client cascades to its projects and every owned image
//! - sweeping removes image files no record points at
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: no stdout, stderr, prompts or exit codes
//! - **Argument parsing**: that's the CLI layer's job
//! - **Confirmations**: the caller decides whether a delete may proceed
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings. It carries the records that
//! were created, changed or listed, search hits, profile views, file paths,
//! and messages with a level. The UI decides how to render them.
//!
//! ## Ordering of side effects
//!
//! Validation runs before anything is touched: a rejected command leaves
//! tables and image directories exactly as they were. After validation,
//! image files are written or removed first and rows second, so a failure
//! halfway leaves at worst an orphan file (which `sweep` cleans) rather than
//! a row pointing at nothing.
//!
//! ## Testing Strategy
//!
//! Command tests use [`crate::test_utils::TestEnv`]: the in-memory table
//! backend plus real image directories in a temp dir.
//!
//! ## Command Modules
//!
//! - [`create`]: Register clients and projects
//! - [`view`]: Client and project profiles, a client's projects
//! - [`search`]: Combined search, birthday listing
//! - [`update`]: Edit clients (with id rename) and projects
//! - [`delete`]: Cascading client delete, project delete
//! - [`sweep`]: Orphan image cleanup
//! - [`init`]: Create data and image directories
//! - [`paths`]: Report resolved locations
//! - [`helpers`]: Input normalisation and presence checks

use crate::assets::{AssetManager, ImageUpload};
use crate::model::{Client, Project};
use crate::search::SearchHit;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

pub mod create;
pub mod delete;
pub mod helpers;
pub mod init;
pub mod paths;
pub mod search;
pub mod sweep;
pub mod update;
pub mod view;

/// Resolved data and asset locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierPaths {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub client_images_dir: PathBuf,
    pub project_images_dir: PathBuf,
    pub logo: PathBuf,
    pub placeholder: PathBuf,
}

impl DossierPaths {
    /// Default layout under `root`.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let assets = root.join("assets");
        Self {
            data_dir: root.join("data"),
            client_images_dir: assets.join("imagenes_clientes"),
            project_images_dir: assets.join("imagenes_proyectos"),
            logo: assets.join("LOGO_DCC.png"),
            placeholder: assets.join("sin_imagen.png"),
            root,
        }
    }

    pub fn clients_file(&self) -> PathBuf {
        self.data_dir.join(crate::store::Table::Clients.file_name())
    }

    pub fn projects_file(&self) -> PathBuf {
        self.data_dir.join(crate::store::Table::Projects.file_name())
    }

    pub fn asset_manager(&self) -> AssetManager {
        AssetManager::new(&self.client_images_dir, &self.project_images_dir)
            .with_static_images(self.logo.clone(), self.placeholder.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct CmdResult {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clients: Vec<Client>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_profile: Option<ClientProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_profile: Option<ProjectProfile>,
    /// Files created or removed, or locations for `paths`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<PathBuf>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.paths = paths;
        self
    }
}

/// A client with everything its profile page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientProfile {
    pub client: Client,
    pub projects: Vec<Project>,
    /// Stored image if it exists on disk, else the placeholder.
    pub display_image: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProfile {
    pub project: Project,
    /// `None` when the project has no client or its client is gone.
    pub client: Option<Client>,
    /// Carousel images: recorded paths present on disk, in recorded order.
    pub images: Vec<PathBuf>,
    pub placeholder: PathBuf,
}

impl ProjectProfile {
    pub fn carousel(&self, index: usize) -> crate::nav::Carousel {
        crate::nav::Carousel::at(self.images.len(), index)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientInput {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image: Option<ImageUpload>,
}

impl ClientInput {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Default::default()
        }
    }
}

/// What to do with a client's image on edit.
#[derive(Debug, Clone, Default)]
pub enum ImageChange {
    #[default]
    Keep,
    Remove,
    Replace(ImageUpload),
}

/// Full replacement values for a client, the id included.
#[derive(Debug, Clone)]
pub struct ClientUpdate {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image: ImageChange,
}

impl ClientUpdate {
    /// An update that changes nothing; callers override what they edit.
    pub fn from_client(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            address: client.address.clone(),
            birth_date: client.birth_date,
            image: ImageChange::Keep,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub order_code: String,
    pub name: String,
    pub client_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub comments: String,
    pub images: Vec<ImageUpload>,
}

impl ProjectInput {
    pub fn new(
        order_code: impl Into<String>,
        name: impl Into<String>,
        client_id: impl Into<String>,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            order_code: order_code.into(),
            name: name.into(),
            client_id: client_id.into(),
            start_date,
            end_date: None,
            comments: String::new(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectUpdate {
    pub order_code: String,
    pub name: String,
    pub client_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub comments: String,
    /// Recorded paths to drop; their files are deleted.
    pub remove_images: Vec<PathBuf>,
    pub add_images: Vec<ImageUpload>,
}

impl ProjectUpdate {
    pub fn from_project(project: &Project) -> Self {
        Self {
            order_code: project.order_code.clone(),
            name: project.name.clone(),
            client_id: project.client_id.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
            comments: project.comments.clone(),
            remove_images: Vec::new(),
            add_images: Vec::new(),
        }
    }
}

//! # Domain Model: Clients, Projects and their Table Rows
//!
//! This module defines the two record types, [`Client`] and [`Project`], and the
//! raw row types that mirror the CSV columns one-to-one.
//!
//! ## Typed records vs. raw rows
//!
//! Every cell in the tables is a string. Optional values are stored as empty
//! cells, dates as `YYYY-MM-DD`, and a project's image list as a comma-joined
//! string. The rest of the crate never sees that encoding: rows are converted
//! into typed records at load time and back at save time.
//!
//! ```text
//! clientes.csv  ──► ClientRow  ──► Client   (Option<NaiveDate>, Option<PathBuf>, ...)
//! proyectos.csv ──► ProjectRow ──► Project  (NaiveDate, Vec<PathBuf>, ...)
//! ```
//!
//! An empty or whitespace-only cell is "absent". A cell that is present but
//! cannot be parsed (a bad date) makes the whole load fail with
//! [`DossierError::InvalidRow`], naming the table and line.
//!
//! ## Image lists
//!
//! `imagenes_paths` is a plain comma join with no escaping. A path containing a
//! comma splits into two bogus entries on the next load. Known limitation; the
//! store never produces such paths itself because stems come from ids and
//! order codes.
//!
//! ## Legacy files
//!
//! Older client tables were written without the `fecha_nacimiento` column. All
//! columns after the key default to empty when missing, so those files load
//! with no birth dates.

use crate::error::{DossierError, Result};
use crate::store::Table;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const CLIENT_COLUMNS: [&str; 6] = [
    "cliente_id",
    "nombre",
    "apellido",
    "direccion",
    "imagen_path",
    "fecha_nacimiento",
];

pub const PROJECT_COLUMNS: [&str; 7] = [
    "codigo_orden",
    "nombre_proyecto",
    "cliente_id",
    "fecha_inicio",
    "fecha_fin",
    "imagenes_paths",
    "comentarios",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub image_ref: Option<PathBuf>,
}

impl Client {
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: None,
            birth_date: None,
            image_ref: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_ref = Some(path.into());
        self
    }

    /// "First Last", without a trailing space when the last name is empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Same month and day. A Feb 29 birthday only matches on leap years.
    pub fn has_birthday_on(&self, date: NaiveDate) -> bool {
        self.birth_date
            .map(|b| b.month() == date.month() && b.day() == date.day())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub order_code: String,
    pub name: String,
    /// Not enforced: may name a client that no longer exists.
    pub client_id: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub image_refs: Vec<PathBuf>,
    pub comments: String,
}

impl Project {
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
            image_refs: Vec::new(),
            comments: String::new(),
        }
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_images(mut self, paths: Vec<PathBuf>) -> Self {
        self.image_refs = paths;
        self
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn is_in_progress(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn belongs_to(&self, client_id: &str) -> bool {
        !client_id.is_empty() && self.client_id == client_id
    }

    /// Order codes compare case-insensitively.
    pub fn has_code(&self, code: &str) -> bool {
        codes_match(&self.order_code, code)
    }
}

pub fn codes_match(a: &str, b: &str) -> bool {
    a.trim().to_uppercase() == b.trim().to_uppercase()
}

// --- Raw rows ---

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ClientRow {
    #[serde(rename = "cliente_id")]
    pub id: String,
    #[serde(rename = "nombre", default)]
    pub first_name: String,
    #[serde(rename = "apellido", default)]
    pub last_name: String,
    #[serde(rename = "direccion", default)]
    pub address: String,
    #[serde(rename = "imagen_path", default)]
    pub image_path: String,
    #[serde(rename = "fecha_nacimiento", default)]
    pub birth_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProjectRow {
    #[serde(rename = "codigo_orden")]
    pub order_code: String,
    #[serde(rename = "nombre_proyecto", default)]
    pub name: String,
    #[serde(rename = "cliente_id", default)]
    pub client_id: String,
    #[serde(rename = "fecha_inicio", default)]
    pub start_date: String,
    #[serde(rename = "fecha_fin", default)]
    pub end_date: String,
    #[serde(rename = "imagenes_paths", default)]
    pub image_paths: String,
    #[serde(rename = "comentarios", default)]
    pub comments: String,
}

impl From<&Client> for ClientRow {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            first_name: client.first_name.clone(),
            last_name: client.last_name.clone(),
            address: client.address.clone().unwrap_or_default(),
            image_path: client
                .image_ref
                .as_deref()
                .map(path_cell)
                .unwrap_or_default(),
            birth_date: format_date(client.birth_date),
        }
    }
}

impl ClientRow {
    pub fn into_client(self, line: u64) -> Result<Client> {
        let birth_date = parse_date(&self.birth_date).map_err(|detail| {
            DossierError::InvalidRow {
                table: Table::Clients,
                line,
                detail: format!("fecha_nacimiento: {}", detail),
            }
        })?;

        Ok(Client {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            address: present(self.address),
            birth_date,
            image_ref: present(self.image_path).map(PathBuf::from),
        })
    }
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            order_code: project.order_code.clone(),
            name: project.name.clone(),
            client_id: project.client_id.clone(),
            start_date: project.start_date.format(DATE_FORMAT).to_string(),
            end_date: format_date(project.end_date),
            image_paths: join_image_refs(&project.image_refs),
            comments: project.comments.clone(),
        }
    }
}

impl ProjectRow {
    pub fn into_project(self, line: u64) -> Result<Project> {
        let invalid = |detail: String| DossierError::InvalidRow {
            table: Table::Projects,
            line,
            detail,
        };

        let start_date = parse_date(&self.start_date)
            .map_err(|e| invalid(format!("fecha_inicio: {}", e)))?
            .ok_or_else(|| invalid("fecha_inicio is required".to_string()))?;
        let end_date =
            parse_date(&self.end_date).map_err(|e| invalid(format!("fecha_fin: {}", e)))?;

        Ok(Project {
            order_code: self.order_code,
            name: self.name,
            client_id: self.client_id,
            start_date,
            end_date,
            image_refs: split_image_refs(&self.image_paths),
            comments: self.comments,
        })
    }
}

// --- Cell helpers ---

fn present(cell: String) -> Option<String> {
    if cell.trim().is_empty() {
        None
    } else {
        Some(cell)
    }
}

fn path_cell(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Parses a date cell. Empty means absent; a trailing time component
/// (`2024-03-01 00:00:00`, `2024-03-01T00:00:00`) is ignored.
pub fn parse_date(cell: &str) -> std::result::Result<Option<NaiveDate>, String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let day_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(day_part, DATE_FORMAT)
        .map(Some)
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", trimmed))
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn split_image_refs(cell: &str) -> Vec<PathBuf> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

pub fn join_image_refs(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| path_cell(p))
        .collect::<Vec<_>>()
        .join(",")
}

//! # Storage Layer
//!
//! Two flat tables, Clients and Projects, each a CSV file with a header row.
//! There is no cache and no partial update: every mutation is a full
//! read-modify-write of one table.
//!
//! ```text
//! data/
//! ├── clientes.csv     # cliente_id,nombre,apellido,direccion,imagen_path,fecha_nacimiento
//! ├── proyectos.csv    # codigo_orden,nombre_proyecto,cliente_id,fecha_inicio,fecha_fin,imagenes_paths,comentarios
//! └── .dossier.lock    # advisory lock held during read-modify-write
//! ```
//!
//! ## Split of responsibilities
//!
//! - [`backend::TableBackend`]: the "how" of storage. Loads and saves whole
//!   tables. [`fs_backend::FsBackend`] is production, [`mem_backend::MemBackend`]
//!   is for tests.
//! - [`record_store::RecordStore`]: the "what". Keys, uniqueness, row
//!   replacement, reassignment of projects after a client rename.
//!
//! ## Write discipline
//!
//! 1. Take the write lock (advisory `flock` on the file backend).
//! 2. Load the table.
//! 3. Mutate in memory.
//! 4. Serialize to a temp file in the same directory and rename it over the
//!    table. A crash mid-write leaves the old table intact.
//!
//! The lock narrows the lost-update window between two processes but is not a
//! transaction: a cascade touching both tables takes the lock once per table
//! operation.
//!
//! ## Ordering
//!
//! Rows keep insertion order. Nothing is sorted on load or save.

use serde::Serialize;
use std::fmt;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod record_store;

pub use record_store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Clients,
    Projects,
}

impl Table {
    /// File name of the table inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Table::Clients => "clientes.csv",
            Table::Projects => "proyectos.csv",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Clients => write!(f, "client"),
            Table::Projects => write!(f, "project"),
        }
    }
}

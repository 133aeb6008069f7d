use crate::store::Table;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DossierError {
    /// A required field is missing or malformed. Raised before any mutation.
    #[error("{0}")]
    Validation(String),

    #[error("A {table} record with key '{key}' already exists")]
    DuplicateKey { table: Table, key: String },

    #[error("No {table} record with key '{key}'")]
    NotFound { table: Table, key: String },

    #[error("Malformed {table} row at line {line}: {detail}")]
    InvalidRow {
        table: Table,
        line: u64,
        detail: String,
    },

    #[error("Cannot handle '{event}' while on '{from}'")]
    InvalidTransition { from: String, event: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Config error: {0}")]
    Config(String),
}

impl DossierError {
    /// Errors the user can fix by correcting their input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DossierError::Validation(_) | DossierError::DuplicateKey { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DossierError::NotFound { .. })
    }
}

impl From<confique::Error> for DossierError {
    fn from(err: confique::Error) -> Self {
        DossierError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DossierError>;

//! # Configuration
//!
//! Dossier configuration is loaded with [`confique`] from layered sources.
//!
//! ## Storage Hierarchy
//!
//! Resolved in priority order:
//! 1. **Environment variables**: `DOSSIER_DATA_DIR`, `DOSSIER_LOCK`, ...
//! 2. **Local Config**: `dossier.toml` in the working root, or the file given
//!    with `--config` (which must exist).
//! 3. **User Config**: `dossier.toml` in the OS config directory (via `directories`).
//! 4. **Compiled Defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `data_dir` | `DOSSIER_DATA_DIR` | `data` |
//! | `client_images_dir` | `DOSSIER_CLIENT_IMAGES_DIR` | `assets/imagenes_clientes` |
//! | `project_images_dir` | `DOSSIER_PROJECT_IMAGES_DIR` | `assets/imagenes_proyectos` |
//! | `logo` | `DOSSIER_LOGO` | `assets/LOGO_DCC.png` |
//! | `placeholder` | `DOSSIER_PLACEHOLDER` | `assets/sin_imagen.png` |
//! | `lock` | `DOSSIER_LOCK` | `true` |
//! | `sweep_project_images` | `DOSSIER_SWEEP_PROJECT_IMAGES` | `false` |
//!
//! Relative paths resolve against the working root, see [`DossierConfig::paths`].

use crate::commands::DossierPaths;
use crate::error::{DossierError, Result};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "dossier.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DossierConfig {
    /// Directory holding clientes.csv and proyectos.csv.
    #[config(env = "DOSSIER_DATA_DIR", default = "data")]
    pub data_dir: PathBuf,

    #[config(env = "DOSSIER_CLIENT_IMAGES_DIR", default = "assets/imagenes_clientes")]
    pub client_images_dir: PathBuf,

    #[config(env = "DOSSIER_PROJECT_IMAGES_DIR", default = "assets/imagenes_proyectos")]
    pub project_images_dir: PathBuf,

    #[config(env = "DOSSIER_LOGO", default = "assets/LOGO_DCC.png")]
    pub logo: PathBuf,

    /// Shown when a record has no image or its file is gone.
    #[config(env = "DOSSIER_PLACEHOLDER", default = "assets/sin_imagen.png")]
    pub placeholder: PathBuf,

    /// Take an advisory lock on the data directory around every write.
    #[config(env = "DOSSIER_LOCK", default = true)]
    pub lock: bool,

    /// Also sweep the project image directory on `sweep`.
    #[config(env = "DOSSIER_SWEEP_PROJECT_IMAGES", default = false)]
    pub sweep_project_images: bool,
}

impl Default for DossierConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            client_images_dir: PathBuf::from("assets/imagenes_clientes"),
            project_images_dir: PathBuf::from("assets/imagenes_proyectos"),
            logo: PathBuf::from("assets/LOGO_DCC.png"),
            placeholder: PathBuf::from("assets/sin_imagen.png"),
            lock: true,
            sweep_project_images: false,
        }
    }
}

impl DossierConfig {
    /// Loads all layers. `explicit` replaces `{root}/dossier.toml` and must exist.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let local = match explicit {
            Some(path) if !path.is_file() => {
                return Err(DossierError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => root.join(CONFIG_FILE),
        };

        let mut builder = Self::builder().env().file(&local);
        if let Some(user) = user_config_file() {
            builder = builder.file(user);
        }
        let config = builder.load()?;
        tracing::debug!(?config, local = %local.display(), "configuration loaded");
        Ok(config)
    }

    pub fn paths(&self, root: &Path) -> DossierPaths {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        };
        DossierPaths {
            root: root.to_path_buf(),
            data_dir: resolve(&self.data_dir),
            client_images_dir: resolve(&self.client_images_dir),
            project_images_dir: resolve(&self.project_images_dir),
            logo: resolve(&self.logo),
            placeholder: resolve(&self.placeholder),
        }
    }
}

/// `dossier.toml` under the OS config directory, if one can be determined.
pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dossier").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

//! # Image Assets
//!
//! Clients own at most one image, projects own an ordered list. Images are
//! plain files in two directories; records hold their paths.
//!
//! ## Naming
//!
//! - Client image: `{client_dir}/{client_id}.{ext}`
//! - Project image: `{project_dir}/{order_code}_{n}.{ext}`, `n` starting at 1
//!
//! The extension is taken from the uploaded file name. Uploads are decoded and
//! re-encoded in the format that extension names, so a file that is not
//! really an image is rejected before anything is written.
//!
//! ## Absent files
//!
//! A recorded path whose file is gone is treated as "no image", never as an
//! error. Deleting or renaming a missing file is a no-op. This keeps edit
//! flows idempotent after a partial earlier failure.
//!
//! ## Orphans
//!
//! [`sweep_orphans`] deletes every file in a directory whose path is not in the
//! given set. Both sides are canonicalized before comparing, so a root
//! reached through `..` or a symlink still recognises the recorded files.

use crate::error::{DossierError, Result};
use crate::model::codes_match;
use image::{DynamicImage, ImageFormat};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Raw uploaded image: the bytes plus the name it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(DossierError::Io)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// Extension of the original file name. Falls back to the sniffed format
    /// when the name has none.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .or_else(|| {
                image::guess_format(&self.bytes)
                    .ok()
                    .and_then(|f| f.extensions_str().first().map(|e| e.to_string()))
            })
    }
}

/// Decodes `upload` and writes it as `{stem}.{ext}` under `dir`, overwriting.
pub fn store_image(upload: &ImageUpload, dir: &Path, stem: &str) -> Result<PathBuf> {
    let ext = upload.extension().ok_or_else(|| {
        DossierError::Validation(format!("Cannot tell the image type of '{}'", upload.file_name))
    })?;
    let format = ImageFormat::from_extension(&ext).ok_or_else(|| {
        DossierError::Validation(format!("Unsupported image type '.{}'", ext))
    })?;

    let decoded = image::load_from_memory(&upload.bytes)?;
    let encodable = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => decoded,
    };
    let mut buf = Vec::new();
    encodable.write_to(&mut Cursor::new(&mut buf), format)?;

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(DossierError::Io)?;
    }
    let target = dir.join(format!("{}.{}", stem, ext));
    let tmp = dir.join(format!(".upload-{}.tmp", Uuid::new_v4()));
    fs::write(&tmp, buf).map_err(DossierError::Io)?;
    if let Err(e) = fs::rename(&tmp, &target) {
        let _ = fs::remove_file(&tmp);
        return Err(DossierError::Io(e));
    }

    tracing::info!(path = %target.display(), "stored image");
    Ok(target)
}

/// Renames the file to `{new_stem}.{ext}` in the same directory.
/// Returns `old` unchanged when there is nothing on disk to rename.
pub fn rename_image(old: &Path, new_stem: &str) -> Result<PathBuf> {
    if !old.is_file() {
        tracing::debug!(path = %old.display(), "rename skipped, image missing");
        return Ok(old.to_path_buf());
    }
    let file_name = match old.extension() {
        Some(ext) => format!("{}.{}", new_stem, ext.to_string_lossy()),
        None => new_stem.to_string(),
    };
    let new = old.with_file_name(file_name);
    if new != old {
        fs::rename(old, &new).map_err(DossierError::Io)?;
        tracing::info!(from = %old.display(), to = %new.display(), "renamed image");
    }
    Ok(new)
}

/// Removes the file if present. Returns whether something was deleted.
pub fn delete_image(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(DossierError::Io)?;
    tracing::info!(path = %path.display(), "deleted image");
    Ok(true)
}

/// Deletes every file in `dir` that is not in `valid`. Returns what was removed.
///
/// A missing directory is a no-op. Subdirectories are left alone. A file that
/// cannot be removed is logged and skipped.
pub fn sweep_orphans(dir: &Path, valid: &HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    // Referenced paths that are gone cannot match any file, so they drop out
    let valid: HashSet<PathBuf> = valid
        .iter()
        .filter_map(|p| fs::canonicalize(p).ok())
        .collect();

    let mut removed = Vec::new();
    for entry in fs::read_dir(dir).map_err(DossierError::Io)? {
        let entry = entry.map_err(DossierError::Io)?;
        let path = dir.join(entry.file_name());
        if !path.is_file() {
            continue;
        }
        match fs::canonicalize(&path) {
            Ok(canonical) if valid.contains(&canonical) => continue,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not resolve image path");
                continue;
            }
        }
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not remove orphan");
            }
        }
    }

    tracing::info!(dir = %dir.display(), removed = removed.len(), "swept orphan images");
    Ok(removed)
}

fn stem_matches(found: &OsStr, stem: &str) -> bool {
    found.to_str().map(|f| codes_match(f, stem)).unwrap_or(false)
}

/// The path itself if it names an existing file, otherwise `None`.
pub fn existing(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.is_file())
}

/// Image directories and static images, fixed at startup.
#[derive(Debug, Clone)]
pub struct AssetManager {
    client_dir: PathBuf,
    project_dir: PathBuf,
    logo: PathBuf,
    placeholder: PathBuf,
}

impl AssetManager {
    pub fn new(client_dir: impl Into<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        let client_dir = client_dir.into();
        let assets_root = client_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            client_dir,
            project_dir: project_dir.into(),
            logo: assets_root.join("LOGO_DCC.png"),
            placeholder: assets_root.join("sin_imagen.png"),
        }
    }

    pub fn with_static_images(mut self, logo: PathBuf, placeholder: PathBuf) -> Self {
        self.logo = logo;
        self.placeholder = placeholder;
        self
    }

    pub fn client_dir(&self) -> &Path {
        &self.client_dir
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn logo(&self) -> &Path {
        &self.logo
    }

    pub fn placeholder(&self) -> &Path {
        &self.placeholder
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.client_dir, &self.project_dir] {
            fs::create_dir_all(dir).map_err(DossierError::Io)?;
        }
        Ok(())
    }

    pub fn store_client_image(&self, upload: &ImageUpload, client_id: &str) -> Result<PathBuf> {
        store_image(upload, &self.client_dir, client_id)
    }

    pub fn store_project_image(
        &self,
        upload: &ImageUpload,
        order_code: &str,
        slot: usize,
    ) -> Result<PathBuf> {
        store_image(upload, &self.project_dir, &format!("{}_{}", order_code, slot))
    }

    /// First slot `n >= 1` such that no kept reference and no file in the
    /// project directory already uses the stem `{order_code}_{n}`, in any case.
    pub fn next_project_slot(&self, order_code: &str, kept: &[PathBuf]) -> usize {
        let stem_taken = |stem: &str| {
            let by_ref = kept
                .iter()
                .any(|p| p.file_stem().map(|s| stem_matches(s, stem)).unwrap_or(false));
            by_ref || self.stem_on_disk(stem)
        };
        (1..)
            .find(|n| !stem_taken(&format!("{}_{}", order_code, n)))
            .unwrap_or(1)
    }

    fn stem_on_disk(&self, stem: &str) -> bool {
        fs::read_dir(&self.project_dir)
            .map(|entries| {
                entries.flatten().any(|e| {
                    Path::new(&e.file_name())
                        .file_stem()
                        .map(|s| stem_matches(s, stem))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Image to show for a record: the stored one if it exists, else the placeholder.
    pub fn display_image(&self, image_ref: Option<&Path>) -> PathBuf {
        existing(image_ref)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.placeholder.clone())
    }

    /// Deletes client-directory files not referenced by any client.
    pub fn sweep_client_images(&self, valid: &HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
        sweep_orphans(&self.client_dir, valid)
    }

    /// Deletes project-directory files not referenced by any project.
    pub fn sweep_project_images(&self, valid: &HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
        sweep_orphans(&self.project_dir, valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{png_bytes, TestEnv};

    #[test]
    fn store_image_uses_stem_and_original_extension() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("foto.PNG", png_bytes());
        let path = store_image(&upload, env.assets.client_dir(), "123").unwrap();
        assert_eq!(path, env.assets.client_dir().join("123.PNG"));
        assert!(path.is_file());
    }

    #[test]
    fn store_image_reencodes_to_jpeg() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("foto.jpg", png_bytes());
        let path = env.assets.store_client_image(&upload, "7").unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn store_image_overwrites_existing_file() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("a.png", png_bytes());
        let first = env.assets.store_client_image(&upload, "1").unwrap();
        let second = env.assets.store_client_image(&upload, "1").unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read_dir(env.assets.client_dir()).unwrap().count(), 1);
    }

    #[test]
    fn store_image_rejects_non_images_before_writing() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("notes.png", b"not an image".to_vec());
        assert!(matches!(
            env.assets.store_client_image(&upload, "1"),
            Err(DossierError::Image(_))
        ));
        assert!(!env.assets.client_dir().join("1.png").exists());
    }

    #[test]
    fn extension_falls_back_to_sniffed_format() {
        let upload = ImageUpload::new("clipboard", png_bytes());
        assert_eq!(upload.extension().as_deref(), Some("png"));
    }

    #[test]
    fn rename_keeps_extension() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("a.png", png_bytes());
        let old = env.assets.store_client_image(&upload, "old").unwrap();
        let new = rename_image(&old, "new").unwrap();
        assert_eq!(new, env.assets.client_dir().join("new.png"));
        assert!(new.is_file());
        assert!(!old.exists());
    }

    #[test]
    fn rename_missing_file_returns_original_path() {
        let env = TestEnv::new();
        let ghost = env.assets.client_dir().join("ghost.png");
        assert_eq!(rename_image(&ghost, "new").unwrap(), ghost);
    }

    #[test]
    fn delete_missing_file_is_noop() {
        let env = TestEnv::new();
        assert!(!delete_image(&env.assets.client_dir().join("ghost.png")).unwrap());
    }

    #[test]
    fn sweep_removes_exactly_unreferenced_files() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("a.png", png_bytes());
        let keep = env.assets.store_client_image(&upload, "keep").unwrap();
        let stale = env.assets.store_client_image(&upload, "stale").unwrap();
        fs::create_dir_all(env.assets.client_dir().join("nested")).unwrap();

        let valid: HashSet<PathBuf> = [keep.clone()].into_iter().collect();
        let removed = env.assets.sweep_client_images(&valid).unwrap();

        assert_eq!(removed, vec![stale.clone()]);
        assert!(keep.is_file());
        assert!(!stale.exists());
        assert!(env.assets.client_dir().join("nested").is_dir());
    }

    #[test]
    fn sweep_matches_references_made_through_another_route() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("a.png", png_bytes());
        let keep = env.assets.store_client_image(&upload, "keep").unwrap();
        fs::create_dir_all(env.root.join("sub")).unwrap();

        let detour = env.root.join("sub/../assets/imagenes_clientes");
        let valid: HashSet<PathBuf> = [keep.clone()].into_iter().collect();

        assert!(sweep_orphans(&detour, &valid).unwrap().is_empty());
        assert!(keep.is_file());
    }

    #[test]
    fn sweep_of_missing_directory_is_noop() {
        let env = TestEnv::new();
        let missing = env.root.join("nowhere");
        assert!(sweep_orphans(&missing, &HashSet::new()).unwrap().is_empty());
    }

    #[test]
    fn next_slot_skips_kept_refs_and_files_on_disk() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("a.png", png_bytes());
        env.assets.store_project_image(&upload, "OP-1", 2).unwrap();
        let kept = vec![env.assets.project_dir().join("OP-1_1.png")];
        assert_eq!(env.assets.next_project_slot("OP-1", &kept), 3);
        assert_eq!(env.assets.next_project_slot("OP-2", &[]), 1);
    }

    #[test]
    fn next_slot_ignores_case_of_existing_stems() {
        let env = TestEnv::new();
        let upload = ImageUpload::new("a.png", png_bytes());
        let kept = vec![env.assets.store_project_image(&upload, "OP-1", 1).unwrap()];
        assert_eq!(env.assets.next_project_slot("op-1", &kept), 2);
        assert_eq!(env.assets.next_project_slot("op-1", &[]), 2);
    }

    #[test]
    fn display_image_falls_back_to_placeholder() {
        let env = TestEnv::new();
        let ghost = env.assets.client_dir().join("ghost.png");
        assert_eq!(
            env.assets.display_image(Some(&ghost)),
            env.assets.placeholder()
        );
        assert_eq!(env.assets.display_image(None), env.assets.placeholder());
    }
}

use crate::assets::AssetManager;
use crate::store::mem_backend::MemBackend;
use crate::store::RecordStore;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: RecordStore<MemBackend>,
    pub assets: AssetManager,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        let assets = AssetManager::new(
            root.join("assets").join("imagenes_clientes"),
            root.join("assets").join("imagenes_proyectos"),
        );
        assets.ensure_dirs().expect("failed to create asset dirs");
        Self {
            _temp_dir: temp_dir,
            store: RecordStore::with_backend(MemBackend::new()),
            assets,
            root,
        }
    }
}

/// A tiny valid PNG with an alpha channel.
pub fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(2, 2, Rgba([200, 120, 80, 255]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("failed to encode test png");
    buf
}

use crate::commands::{CmdMessage, CmdResult, DossierPaths};
use crate::error::Result;
use std::fs;

/// Creates the data directory and both image directories. Existing
/// directories and tables are left as they are.
pub fn run(paths: &DossierPaths) -> Result<CmdResult> {
    fs::create_dir_all(&paths.data_dir)?;
    paths.asset_manager().ensure_dirs()?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Initialized dossier at {}",
        paths.root.display()
    )));
    for missing in [&paths.logo, &paths.placeholder]
        .into_iter()
        .filter(|p| !p.is_file())
    {
        result.add_message(CmdMessage::warning(format!(
            "Static image not found: {}",
            missing.display()
        )));
    }

    Ok(result.with_paths(vec![
        paths.data_dir.clone(),
        paths.client_images_dir.clone(),
        paths.project_images_dir.clone(),
    ]))
}

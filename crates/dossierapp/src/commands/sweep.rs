use crate::assets::AssetManager;
use crate::commands::helpers::plural;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::TableBackend;
use crate::store::RecordStore;
use std::collections::HashSet;
use std::path::PathBuf;

/// Deletes unreferenced files from the client image directory, and from the
/// project image directory when `include_projects` is set.
pub fn run<B: TableBackend>(
    store: &RecordStore<B>,
    assets: &AssetManager,
    include_projects: bool,
) -> Result<CmdResult> {
    let client_refs: HashSet<PathBuf> = store
        .load_clients()?
        .into_iter()
        .filter_map(|c| c.image_ref)
        .collect();
    let mut removed = assets.sweep_client_images(&client_refs)?;

    if include_projects {
        let project_refs: HashSet<PathBuf> = store
            .load_projects()?
            .into_iter()
            .flat_map(|p| p.image_refs)
            .collect();
        removed.extend(assets.sweep_project_images(&project_refs)?);
    }

    let mut result = CmdResult::default();
    result.add_message(if removed.is_empty() {
        CmdMessage::info("No orphaned images")
    } else {
        CmdMessage::success(format!(
            "Removed {}",
            plural(removed.len(), "orphaned image", "orphaned images")
        ))
    });
    Ok(result.with_paths(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageUpload;
    use crate::model::{Client, Project};
    use crate::test_utils::{png_bytes, TestEnv};
    use chrono::NaiveDate;

    fn seed(env: &mut TestEnv) -> (PathBuf, PathBuf) {
        let upload = ImageUpload::new("a.png", png_bytes());
        let kept = env.assets.store_client_image(&upload, "1").unwrap();
        env.assets.store_client_image(&upload, "stale").unwrap();
        let project_kept = env.assets.store_project_image(&upload, "OP-1", 1).unwrap();
        env.assets.store_project_image(&upload, "OP-9", 1).unwrap();

        env.store
            .append_client(Client::new("1", "Ana", "").with_image(kept.clone()))
            .unwrap();
        env.store
            .append_project(
                Project::new("OP-1", "Mesa", "1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                    .with_images(vec![project_kept.clone()]),
            )
            .unwrap();
        (kept, project_kept)
    }

    #[test]
    fn default_sweep_leaves_project_directory_alone() {
        let mut env = TestEnv::new();
        let (kept, _) = seed(&mut env);

        let result = run(&env.store, &env.assets, false).unwrap();

        assert_eq!(result.paths, vec![env.assets.client_dir().join("stale.png")]);
        assert!(kept.is_file());
        assert!(env.assets.project_dir().join("OP-9_1.png").is_file());
    }

    #[test]
    fn project_sweep_keeps_referenced_project_images() {
        let mut env = TestEnv::new();
        let (_, project_kept) = seed(&mut env);

        let result = run(&env.store, &env.assets, true).unwrap();

        assert_eq!(result.paths.len(), 2);
        assert!(project_kept.is_file());
        assert!(!env.assets.project_dir().join("OP-9_1.png").exists());
    }

    #[test]
    fn clean_directories_report_nothing_removed() {
        let env = TestEnv::new();
        let result = run(&env.store, &env.assets, true).unwrap();
        assert!(result.paths.is_empty());
        assert_eq!(result.messages[0].content, "No orphaned images");
    }
}

use crate::assets::{delete_image, rename_image, AssetManager};
use crate::commands::helpers::{optional_text, plural, require};
use crate::commands::{ClientUpdate, CmdMessage, CmdResult, ImageChange, ProjectUpdate};
use crate::error::{DossierError, Result};
use crate::model::{Client, Project};
use crate::store::backend::TableBackend;
use crate::store::RecordStore;

/// Replaces the client keyed `old_id`.
///
/// When the id changes, the image file follows the new id and every project
/// owned by the old id is reassigned. The reassignment is a second table
/// write: if it fails, the client row already carries the new id.
pub fn client<B: TableBackend>(
    store: &mut RecordStore<B>,
    assets: &AssetManager,
    old_id: &str,
    update: ClientUpdate,
) -> Result<CmdResult> {
    let current = store.get_client(old_id.trim())?;
    let new_id = update.id.trim().to_string();
    let first_name = update.first_name.trim().to_string();
    require(&new_id, "Client id")?;
    require(&first_name, "First name")?;

    let renamed = new_id != current.id;
    if renamed && store.client_exists(&new_id)? {
        return Err(DossierError::Validation(format!(
            "A client with id '{}' already exists",
            new_id
        )));
    }

    let image_ref = match update.image {
        ImageChange::Remove => {
            if let Some(old) = &current.image_ref {
                delete_image(old)?;
            }
            None
        }
        ImageChange::Replace(upload) => {
            let stored = assets.store_client_image(&upload, &new_id)?;
            if let Some(old) = current.image_ref.as_ref().filter(|old| **old != stored) {
                delete_image(old)?;
            }
            Some(stored)
        }
        ImageChange::Keep => match &current.image_ref {
            Some(old) if renamed => Some(rename_image(old, &new_id)?),
            other => other.clone(),
        },
    };

    let client = Client {
        id: new_id,
        first_name,
        last_name: update.last_name.trim().to_string(),
        address: optional_text(update.address),
        birth_date: update.birth_date,
        image_ref,
    };
    store.update_client(&current.id, client.clone())?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client updated: {}",
        client.full_name()
    )));

    if renamed {
        let moved = store.reassign_projects(&current.id, &client.id)?;
        tracing::info!(from = %current.id, to = %client.id, moved, "client renamed");
        if moved > 0 {
            result.add_message(CmdMessage::info(format!(
                "{} moved to '{}'",
                plural(moved, "project", "projects"),
                client.id
            )));
        }
    }

    Ok(result.with_clients(vec![client]))
}

/// Replaces the project keyed `old_code`.
///
/// Existing image files keep their names when the code changes. New uploads
/// take the first `{code}_{n}` not used by a kept image or a file already in
/// the project directory.
pub fn project<B: TableBackend>(
    store: &mut RecordStore<B>,
    assets: &AssetManager,
    old_code: &str,
    update: ProjectUpdate,
) -> Result<CmdResult> {
    let current = store.get_project(old_code)?;
    let order_code = update.order_code.trim().to_string();
    require(&order_code, "Order code")?;
    if store.project_code_taken(&order_code, Some(&current.order_code))? {
        return Err(DossierError::Validation(format!(
            "A project with order code '{}' already exists",
            order_code
        )));
    }

    let mut result = CmdResult::default();
    for path in &update.remove_images {
        if !current.image_refs.contains(path) {
            result.add_message(CmdMessage::warning(format!(
                "'{}' is not an image of {}",
                path.display(),
                current.order_code
            )));
        }
    }

    let mut image_refs = Vec::with_capacity(current.image_refs.len());
    for path in current.image_refs {
        if update.remove_images.contains(&path) {
            delete_image(&path)?;
        } else {
            image_refs.push(path);
        }
    }
    for upload in &update.add_images {
        let slot = assets.next_project_slot(&order_code, &image_refs);
        image_refs.push(assets.store_project_image(upload, &order_code, slot)?);
    }

    let project = Project {
        order_code,
        name: update.name.trim().to_string(),
        client_id: update.client_id.trim().to_string(),
        start_date: update.start_date,
        end_date: update.end_date,
        image_refs,
        comments: update.comments,
    };
    store.update_project(&current.order_code, project.clone())?;
    tracing::info!(from = %current.order_code, to = %project.order_code, "project updated");

    result.add_message(CmdMessage::success(format!(
        "Project updated: {} ({})",
        project.name, project.order_code
    )));
    Ok(result.with_projects(vec![project]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageUpload;
    use crate::commands::{create, ClientInput, ProjectInput};
    use crate::test_utils::{png_bytes, TestEnv};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload::new(name, png_bytes())
    }

    fn add_client(env: &mut TestEnv, id: &str, with_image: bool) -> Client {
        let mut input = ClientInput::new(id, "Ana", "Lopez");
        if with_image {
            input.image = Some(upload("foto.png"));
        }
        create::client(&mut env.store, &env.assets, input)
            .unwrap()
            .clients
            .remove(0)
    }

    fn add_project(env: &mut TestEnv, code: &str, client: &str, images: usize) -> Project {
        let mut input = ProjectInput::new(code, "Mesa", client, start());
        input.images = (0..images).map(|_| upload("p.png")).collect();
        create::project(&mut env.store, &env.assets, input)
            .unwrap()
            .projects
            .remove(0)
    }

    #[test]
    fn rename_moves_image_and_reassigns_projects() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", true);
        add_project(&mut env, "OP-1", "A", 0);
        add_project(&mut env, "OP-2", "X", 0);
        add_project(&mut env, "OP-3", "A", 0);

        let mut edit = ClientUpdate::from_client(&ana);
        edit.id = "B".into();
        let result = client(&mut env.store, &env.assets, "A", edit).unwrap();

        let renamed = &result.clients[0];
        let new_image = env.assets.client_dir().join("B.png");
        assert_eq!(renamed.image_ref.as_deref(), Some(new_image.as_path()));
        assert!(new_image.is_file());
        assert!(!env.assets.client_dir().join("A.png").exists());

        let owners: Vec<_> = env
            .store
            .load_projects()
            .unwrap()
            .into_iter()
            .map(|p| p.client_id)
            .collect();
        assert_eq!(owners, vec!["B", "X", "B"]);
        assert!(env.store.get_client("A").unwrap_err().is_not_found());
    }

    #[test]
    fn rename_to_taken_id_changes_nothing() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", true);
        add_client(&mut env, "B", false);
        add_project(&mut env, "OP-1", "A", 0);

        let mut edit = ClientUpdate::from_client(&ana);
        edit.id = "B".into();
        let err = client(&mut env.store, &env.assets, "A", edit).unwrap_err();

        assert!(err.is_validation());
        assert!(env.assets.client_dir().join("A.png").is_file());
        assert_eq!(env.store.get_project("OP-1").unwrap().client_id, "A");
    }

    #[test]
    fn rename_with_missing_image_file_keeps_recorded_path() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", true);
        let old = ana.image_ref.clone().unwrap();
        std::fs::remove_file(&old).unwrap();

        let mut edit = ClientUpdate::from_client(&ana);
        edit.id = "B".into();
        let result = client(&mut env.store, &env.assets, "A", edit).unwrap();
        assert_eq!(result.clients[0].image_ref, Some(old));
    }

    #[test]
    fn remove_image_deletes_file_and_clears_ref() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", true);
        let mut edit = ClientUpdate::from_client(&ana);
        edit.image = ImageChange::Remove;

        let result = client(&mut env.store, &env.assets, "A", edit).unwrap();
        assert_eq!(result.clients[0].image_ref, None);
        assert!(!env.assets.client_dir().join("A.png").exists());
    }

    #[test]
    fn replace_with_other_extension_deletes_old_file() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", true);
        let mut edit = ClientUpdate::from_client(&ana);
        edit.image = ImageChange::Replace(upload("nueva.jpg"));

        let result = client(&mut env.store, &env.assets, "A", edit).unwrap();
        let jpg = env.assets.client_dir().join("A.jpg");
        assert_eq!(result.clients[0].image_ref.as_deref(), Some(jpg.as_path()));
        assert!(jpg.is_file());
        assert!(!env.assets.client_dir().join("A.png").exists());
    }

    #[test]
    fn replace_with_same_path_keeps_new_file() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", true);
        let mut edit = ClientUpdate::from_client(&ana);
        edit.image = ImageChange::Replace(upload("otra.png"));

        client(&mut env.store, &env.assets, "A", edit).unwrap();
        assert!(env.assets.client_dir().join("A.png").is_file());
    }

    #[test]
    fn edit_without_rename_does_not_touch_projects() {
        let mut env = TestEnv::new();
        let ana = add_client(&mut env, "A", false);
        add_project(&mut env, "OP-1", "A", 0);
        let saves = env.store.backend().save_count();

        let mut edit = ClientUpdate::from_client(&ana);
        edit.address = Some(" Calle 2 ".into());
        let result = client(&mut env.store, &env.assets, "A", edit).unwrap();

        assert_eq!(result.clients[0].address.as_deref(), Some("Calle 2"));
        assert_eq!(env.store.backend().save_count(), saves + 1);
    }

    #[test]
    fn project_edit_removes_marked_images_and_fills_first_free_slot() {
        let mut env = TestEnv::new();
        let mesa = add_project(&mut env, "OP-1", "", 3);
        let first = mesa.image_refs[0].clone();

        let mut edit = ProjectUpdate::from_project(&mesa);
        edit.remove_images = vec![first.clone()];
        edit.add_images = vec![upload("nueva.png")];
        let result = project(&mut env.store, &env.assets, "OP-1", edit).unwrap();

        let dir = env.assets.project_dir();
        assert_eq!(
            result.projects[0].image_refs,
            vec![dir.join("OP-1_2.png"), dir.join("OP-1_3.png"), dir.join("OP-1_1.png")]
        );
        assert!(first.is_file());
    }

    #[test]
    fn project_edit_never_overwrites_kept_images() {
        let mut env = TestEnv::new();
        let mesa = add_project(&mut env, "OP-1", "", 2);
        let mut edit = ProjectUpdate::from_project(&mesa);
        edit.remove_images = vec![mesa.image_refs[0].clone()];
        edit.add_images = vec![upload("a.png"), upload("b.png")];

        let result = project(&mut env.store, &env.assets, "OP-1", edit).unwrap();
        let refs = &result.projects[0].image_refs;
        assert_eq!(refs.len(), 3);
        let unique: std::collections::HashSet<&PathBuf> = refs.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(refs.iter().all(|p| p.is_file()));
    }

    #[test]
    fn project_code_change_checks_other_rows_only() {
        let mut env = TestEnv::new();
        let one = add_project(&mut env, "OP-1", "", 0);
        add_project(&mut env, "OP-2", "", 0);

        let mut same = ProjectUpdate::from_project(&one);
        same.order_code = "op-1".into();
        project(&mut env.store, &env.assets, "OP-1", same).unwrap();

        let mut clash = ProjectUpdate::from_project(&one);
        clash.order_code = "op-2".into();
        let err = project(&mut env.store, &env.assets, "op-1", clash).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn project_code_change_keeps_existing_file_names() {
        let mut env = TestEnv::new();
        let mesa = add_project(&mut env, "OP-1", "", 1);
        let mut edit = ProjectUpdate::from_project(&mesa);
        edit.order_code = "OP-9".into();

        let result = project(&mut env.store, &env.assets, "OP-1", edit).unwrap();
        assert_eq!(result.projects[0].image_refs, mesa.image_refs);
        assert!(env.store.get_project("OP-1").unwrap_err().is_not_found());
    }

    #[test]
    fn reused_code_does_not_take_over_renamed_project_images() {
        let mut env = TestEnv::new();
        let mesa = add_project(&mut env, "OP-1", "", 1);
        let mut edit = ProjectUpdate::from_project(&mesa);
        edit.order_code = "OP-9".into();
        project(&mut env.store, &env.assets, "OP-1", edit).unwrap();

        let fresh = add_project(&mut env, "OP-1", "", 1);
        assert_ne!(fresh.image_refs, mesa.image_refs);
        assert_eq!(
            fresh.image_refs,
            vec![env.assets.project_dir().join("OP-1_2.png")]
        );

        crate::commands::delete::project(&mut env.store, "OP-1").unwrap();
        let renamed = env.store.get_project("OP-9").unwrap();
        assert!(renamed.image_refs[0].is_file());
    }

    #[test]
    fn case_only_code_change_does_not_reuse_kept_slot() {
        let mut env = TestEnv::new();
        let mesa = add_project(&mut env, "OP-1", "", 1);
        let mut edit = ProjectUpdate::from_project(&mesa);
        edit.order_code = "op-1".into();
        edit.add_images = vec![upload("q.png")];

        let result = project(&mut env.store, &env.assets, "OP-1", edit).unwrap();
        let refs = &result.projects[0].image_refs;
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[1], env.assets.project_dir().join("op-1_2.png"));
        assert!(refs.iter().all(|p| p.is_file()));
    }

    #[test]
    fn unknown_removal_path_is_a_warning() {
        let mut env = TestEnv::new();
        let mesa = add_project(&mut env, "OP-1", "", 1);
        let mut edit = ProjectUpdate::from_project(&mesa);
        edit.remove_images = vec![PathBuf::from("elsewhere.png")];

        let result = project(&mut env.store, &env.assets, "OP-1", edit).unwrap();
        assert_eq!(result.projects[0].image_refs, mesa.image_refs);
        assert!(result
            .messages
            .iter()
            .any(|m| m.level == crate::commands::MessageLevel::Warning));
    }
}

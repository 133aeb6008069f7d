use crate::assets::{existing, AssetManager};
use crate::commands::{ClientProfile, CmdResult, ProjectProfile};
use crate::error::Result;
use crate::store::backend::TableBackend;
use crate::store::RecordStore;

pub fn client_profile<B: TableBackend>(
    store: &RecordStore<B>,
    assets: &AssetManager,
    id: &str,
) -> Result<CmdResult> {
    let client = store.get_client(id.trim())?;
    let projects = store.projects_of(&client.id)?;
    let display_image = assets.display_image(client.image_ref.as_deref());

    Ok(CmdResult {
        client_profile: Some(ClientProfile {
            client,
            projects,
            display_image,
        }),
        ..Default::default()
    })
}

pub fn project_profile<B: TableBackend>(
    store: &RecordStore<B>,
    assets: &AssetManager,
    order_code: &str,
) -> Result<CmdResult> {
    let project = store.get_project(order_code)?;
    let client = if project.client_id.is_empty() {
        None
    } else {
        store
            .load_clients()?
            .into_iter()
            .find(|c| c.id == project.client_id)
    };
    let images = project
        .image_refs
        .iter()
        .filter(|p| existing(Some(p.as_path())).is_some())
        .cloned()
        .collect();

    Ok(CmdResult {
        project_profile: Some(ProjectProfile {
            project,
            client,
            images,
            placeholder: assets.placeholder().to_path_buf(),
        }),
        ..Default::default()
    })
}

/// The client's projects in table order. The client must exist.
pub fn client_projects<B: TableBackend>(store: &RecordStore<B>, id: &str) -> Result<CmdResult> {
    let client = store.get_client(id.trim())?;
    let projects = store.projects_of(&client.id)?;
    Ok(CmdResult::default()
        .with_clients(vec![client])
        .with_projects(projects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ImageUpload;
    use crate::model::{Client, Project};
    use crate::test_utils::{png_bytes, TestEnv};
    use chrono::NaiveDate;

    fn project(code: &str, client: &str) -> Project {
        Project::new(code, "Mesa", client, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn client_profile_lists_projects_and_falls_back_to_placeholder() {
        let mut env = TestEnv::new();
        env.store
            .append_client(Client::new("1", "Ana", "Lopez").with_image("gone.png"))
            .unwrap();
        env.store.append_project(project("OP-1", "1")).unwrap();
        env.store.append_project(project("OP-2", "2")).unwrap();

        let result = client_profile(&env.store, &env.assets, "1").unwrap();
        let profile = result.client_profile.unwrap();
        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.display_image, env.assets.placeholder());
    }

    #[test]
    fn missing_client_is_not_found() {
        let env = TestEnv::new();
        let err = client_profile(&env.store, &env.assets, "nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn project_profile_keeps_only_images_on_disk() {
        let mut env = TestEnv::new();
        let stored = env
            .assets
            .store_project_image(&ImageUpload::new("a.png", png_bytes()), "OP-1", 1)
            .unwrap();
        let ghost = env.assets.project_dir().join("OP-1_2.png");
        env.store
            .append_project(project("OP-1", "").with_images(vec![ghost, stored.clone()]))
            .unwrap();

        let profile = project_profile(&env.store, &env.assets, "op-1")
            .unwrap()
            .project_profile
            .unwrap();
        assert_eq!(profile.images, vec![stored]);
        assert_eq!(profile.client, None);
        assert_eq!(profile.carousel(4).index(), 0);
    }

    #[test]
    fn project_profile_resolves_owner_when_present() {
        let mut env = TestEnv::new();
        env.store.append_client(Client::new("1", "Ana", "")).unwrap();
        env.store.append_project(project("OP-1", "1")).unwrap();
        env.store.append_project(project("OP-2", "ghost")).unwrap();

        let owned = project_profile(&env.store, &env.assets, "OP-1").unwrap();
        assert_eq!(owned.project_profile.unwrap().client.unwrap().id, "1");
        let orphan = project_profile(&env.store, &env.assets, "OP-2").unwrap();
        assert!(orphan.project_profile.unwrap().client.is_none());
    }

    #[test]
    fn client_projects_requires_existing_client() {
        let mut env = TestEnv::new();
        env.store.append_project(project("OP-1", "ghost")).unwrap();
        assert!(client_projects(&env.store, "ghost").unwrap_err().is_not_found());
    }
}

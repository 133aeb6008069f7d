use crate::assets::delete_image;
use crate::commands::helpers::plural;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::backend::TableBackend;
use crate::store::RecordStore;
use std::path::PathBuf;

/// Deletes a client and everything it owns.
///
/// Order: the client's image, each dependent project's images, the project
/// rows, then the client row. Not atomic: a failure part-way leaves the
/// remaining steps undone and is reported as is.
pub fn client<B: TableBackend>(store: &mut RecordStore<B>, id: &str) -> Result<CmdResult> {
    let client = store.get_client(id.trim())?;
    let projects = store.projects_of(&client.id)?;

    let mut removed_files: Vec<PathBuf> = Vec::new();
    let owned_images = client
        .image_ref
        .iter()
        .chain(projects.iter().flat_map(|p| p.image_refs.iter()));
    for path in owned_images {
        if delete_image(path)? {
            removed_files.push(path.clone());
        }
    }

    for project in &projects {
        store.delete_project(&project.order_code)?;
    }
    let client = store.delete_client(&client.id)?;
    tracing::info!(
        client_id = %client.id,
        projects = projects.len(),
        files = removed_files.len(),
        "client deleted"
    );

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client deleted: {}",
        client.full_name()
    )));
    if !projects.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Also deleted {}",
            plural(projects.len(), "project", "projects")
        )));
    }
    Ok(result
        .with_clients(vec![client])
        .with_projects(projects)
        .with_paths(removed_files))
}

pub fn project<B: TableBackend>(store: &mut RecordStore<B>, order_code: &str) -> Result<CmdResult> {
    let project = store.get_project(order_code)?;

    let mut removed_files = Vec::new();
    for path in &project.image_refs {
        if delete_image(path)? {
            removed_files.push(path.clone());
        }
    }
    let project = store.delete_project(&project.order_code)?;
    tracing::info!(order_code = %project.order_code, files = removed_files.len(), "project deleted");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Project deleted: {} ({})",
        project.name, project.order_code
    )));
    Ok(result.with_projects(vec![project]).with_paths(removed_files))
}

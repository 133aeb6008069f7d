use crate::assets::{delete_image, AssetManager};
use crate::commands::helpers::{normalize_new_code, optional_text, require};
use crate::commands::{ClientInput, CmdMessage, CmdResult, ProjectInput};
use crate::error::{DossierError, Result};
use crate::model::{Client, Project};
use crate::store::backend::TableBackend;
use crate::store::RecordStore;
use std::path::PathBuf;

pub fn client<B: TableBackend>(
    store: &mut RecordStore<B>,
    assets: &AssetManager,
    input: ClientInput,
) -> Result<CmdResult> {
    let id = input.id.trim().to_string();
    let first_name = input.first_name.trim().to_string();
    require(&id, "Client id")?;
    require(&first_name, "First name")?;
    if store.client_exists(&id)? {
        return Err(DossierError::Validation(format!(
            "A client with id '{}' already exists",
            id
        )));
    }

    let image_ref = match &input.image {
        Some(upload) => Some(assets.store_client_image(upload, &id)?),
        None => None,
    };

    let client = Client {
        id,
        first_name,
        last_name: input.last_name.trim().to_string(),
        address: optional_text(input.address),
        birth_date: input.birth_date,
        image_ref,
    };

    if let Err(e) = store.append_client(client.clone()) {
        discard(client.image_ref.iter());
        return Err(e);
    }
    tracing::info!(client_id = %client.id, "client created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Client saved: {}",
        client.full_name()
    )));
    Ok(result.with_clients(vec![client]))
}

pub fn project<B: TableBackend>(
    store: &mut RecordStore<B>,
    assets: &AssetManager,
    input: ProjectInput,
) -> Result<CmdResult> {
    let order_code = normalize_new_code(&input.order_code);
    require(&order_code, "Order code")?;
    if store.project_code_taken(&order_code, None)? {
        return Err(DossierError::Validation(format!(
            "A project with order code '{}' already exists",
            order_code
        )));
    }

    let client_id = input.client_id.trim().to_string();
    let mut result = CmdResult::default();
    if !client_id.is_empty() && !store.client_exists(&client_id)? {
        result.add_message(CmdMessage::warning(format!(
            "No client with id '{}'; the project is saved without a known owner",
            client_id
        )));
    }

    let mut image_refs = Vec::with_capacity(input.images.len());
    for upload in &input.images {
        let slot = assets.next_project_slot(&order_code, &image_refs);
        match assets.store_project_image(upload, &order_code, slot) {
            Ok(path) => image_refs.push(path),
            Err(e) => {
                discard(image_refs.iter());
                return Err(e);
            }
        }
    }

    let project = Project {
        order_code,
        name: input.name.trim().to_string(),
        client_id,
        start_date: input.start_date,
        end_date: input.end_date,
        image_refs,
        comments: input.comments,
    };

    if let Err(e) = store.append_project(project.clone()) {
        discard(project.image_refs.iter());
        return Err(e);
    }
    tracing::info!(order_code = %project.order_code, images = project.image_refs.len(), "project created");

    result.add_message(CmdMessage::success(format!(
        "Project saved: {} ({})",
        project.name, project.order_code
    )));
    Ok(result.with_projects(vec![project]))
}

/// Best-effort removal of files written for a create that then failed.
fn discard<'a>(paths: impl Iterator<Item = &'a PathBuf>) {
    for path in paths {
        if let Err(e) = delete_image(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not discard image");
        }
    }
}

use super::args::{
    ClientAddArgs, ClientCommands, ClientEditArgs, Cli, Commands, ProjectAddArgs, ProjectCommands,
    ProjectEditArgs,
};
use super::print::{
    print_messages, render_client_profile, render_clients, render_hits, render_paths,
    render_project_profile, render_projects,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use dossierapp::api::DossierApi;
use dossierapp::assets::ImageUpload;
use dossierapp::commands::{
    ClientInput, ClientUpdate, CmdResult, ImageChange, ProjectInput, ProjectUpdate,
};
use dossierapp::config::DossierConfig;
use dossierapp::logging::{init_logging, Verbosity};
use dossierapp::store::fs_backend::FsBackend;
use std::path::{Path, PathBuf};

struct AppContext {
    api: DossierApi<FsBackend>,
    json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));
    let mut ctx = init_context(&cli)?;

    match cli.command {
        Commands::Init => handle_init(&ctx),
        Commands::Paths => handle_paths(&ctx),
        Commands::Client(cmd) => match cmd {
            ClientCommands::Add(args) => handle_client_add(&mut ctx, args),
            ClientCommands::Show { id } => handle_client_show(&ctx, &id),
            ClientCommands::Projects { id } => handle_client_projects(&ctx, &id),
            ClientCommands::Edit(args) => handle_client_edit(&mut ctx, args),
            ClientCommands::Rm { id, yes } => handle_client_rm(&mut ctx, &id, yes),
        },
        Commands::Project(cmd) => match cmd {
            ProjectCommands::Add(args) => handle_project_add(&mut ctx, args),
            ProjectCommands::Show { code, image } => handle_project_show(&ctx, &code, image),
            ProjectCommands::Edit(args) => handle_project_edit(&mut ctx, args),
            ProjectCommands::Rm { code, yes } => handle_project_rm(&mut ctx, &code, yes),
        },
        Commands::Search { query } => handle_search(&ctx, &query),
        Commands::Birthdays { on } => {
            handle_birthdays(&ctx, on.unwrap_or_else(|| chrono::Local::now().date_naive()))
        }
        Commands::Sweep { projects } => handle_sweep(&ctx, projects),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    let root = match &cli.root {
        Some(root) if root.is_absolute() => root.clone(),
        Some(root) => cwd.join(root),
        None => cwd,
    };
    // Recorded image paths are absolute; resolve `..` and symlinks so every
    // route to the same root records and matches the same paths.
    // A root that does not exist yet (first `init`) is used as given.
    let root = std::fs::canonicalize(&root).unwrap_or(root);
    let config = DossierConfig::load(&root, cli.config.as_deref())?;
    tracing::debug!(root = %root.display(), "opening dossier");

    Ok(AppContext {
        api: DossierApi::open(&config, &root),
        json: cli.json,
    })
}

/// Prints `result` as JSON, or as rendered text followed by its messages.
fn emit(
    ctx: &AppContext,
    result: &CmdResult,
    render: impl FnOnce(&CmdResult) -> String,
) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    print!("{}", render(result));
    print_messages(&result.messages);
    Ok(())
}

fn nothing(_: &CmdResult) -> String {
    String::new()
}

fn read_upload(path: &Path) -> Result<ImageUpload> {
    ImageUpload::from_path(path).with_context(|| format!("cannot read image {}", path.display()))
}

fn handle_init(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.init()?;
    emit(ctx, &result, nothing)
}

fn handle_paths(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.locations()?;
    emit(ctx, &result, |r| render_paths(&r.paths))
}

fn handle_client_add(ctx: &mut AppContext, args: ClientAddArgs) -> Result<()> {
    let mut input = ClientInput::new(args.id, args.name, args.last_name);
    input.address = args.address;
    input.birth_date = args.birth_date;
    input.image = args.image.as_deref().map(read_upload).transpose()?;

    let result = ctx.api.create_client(input)?;
    emit(ctx, &result, nothing)
}

fn handle_client_show(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.client_profile(id)?;
    emit(ctx, &result, |r| {
        r.client_profile
            .as_ref()
            .map(render_client_profile)
            .unwrap_or_default()
    })
}

fn handle_client_projects(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.client_projects(id)?;
    emit(ctx, &result, |r| render_projects(&r.projects))
}

fn handle_client_edit(ctx: &mut AppContext, args: ClientEditArgs) -> Result<()> {
    let current = ctx.api.client(&args.id)?;
    let mut update = ClientUpdate::from_client(&current);
    if let Some(new_id) = args.new_id {
        update.id = new_id;
    }
    if let Some(name) = args.name {
        update.first_name = name;
    }
    if let Some(last_name) = args.last_name {
        update.last_name = last_name;
    }
    if args.clear_address {
        update.address = None;
    } else if args.address.is_some() {
        update.address = args.address;
    }
    if args.clear_birth_date {
        update.birth_date = None;
    } else if args.birth_date.is_some() {
        update.birth_date = args.birth_date;
    }
    update.image = match (args.remove_image, args.image) {
        (true, _) => ImageChange::Remove,
        (false, Some(path)) => ImageChange::Replace(read_upload(&path)?),
        (false, None) => ImageChange::Keep,
    };

    let result = ctx.api.update_client(&current.id, update)?;
    emit(ctx, &result, nothing)
}

fn handle_client_rm(ctx: &mut AppContext, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let preview = ctx.api.client_projects(id)?;
        let images = preview
            .clients
            .iter()
            .filter_map(|c| c.image_ref.as_ref())
            .chain(preview.projects.iter().flat_map(|p| p.image_refs.iter()))
            .count();
        let name = preview
            .clients
            .first()
            .map(|c| c.full_name())
            .unwrap_or_default();
        emit(ctx, &preview, |r| {
            format!(
                "Would delete client {} with {} project(s) and {} image(s):\n{}",
                name,
                r.projects.len(),
                images,
                render_projects(&r.projects)
            )
        })?;
        bail!("nothing deleted; pass --yes to confirm");
    }

    let result = ctx.api.delete_client(id)?;
    emit(ctx, &result, nothing)
}

fn handle_project_add(ctx: &mut AppContext, args: ProjectAddArgs) -> Result<()> {
    let start = args
        .start
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let mut input = ProjectInput::new(args.code, args.name, args.client, start);
    input.end_date = args.end;
    input.comments = args.comments;
    input.images = args
        .images
        .iter()
        .map(|p| read_upload(p))
        .collect::<Result<_>>()?;

    let result = ctx.api.create_project(input)?;
    emit(ctx, &result, nothing)
}

fn handle_project_show(ctx: &AppContext, code: &str, image: Option<usize>) -> Result<()> {
    let result = ctx.api.project_profile(code)?;
    emit(ctx, &result, |r| {
        r.project_profile
            .as_ref()
            .map(|p| render_project_profile(p, image))
            .unwrap_or_default()
    })
}

fn handle_project_edit(ctx: &mut AppContext, args: ProjectEditArgs) -> Result<()> {
    let current = ctx.api.project(&args.code)?;
    let mut update = ProjectUpdate::from_project(&current);
    if let Some(code) = args.new_code {
        update.order_code = code;
    }
    if let Some(name) = args.name {
        update.name = name;
    }
    if let Some(client) = args.client {
        update.client_id = client;
    }
    if let Some(start) = args.start {
        update.start_date = start;
    }
    if args.in_progress {
        update.end_date = None;
    } else if args.end.is_some() {
        update.end_date = args.end;
    }
    if let Some(comments) = args.comments {
        update.comments = comments;
    }
    let root = ctx.api.paths().root.clone();
    update.remove_images = args
        .remove_images
        .into_iter()
        .map(|p| resolve(&root, p))
        .collect();
    update.add_images = args
        .add_images
        .iter()
        .map(|p| read_upload(p))
        .collect::<Result<_>>()?;

    let result = ctx.api.update_project(&current.order_code, update)?;
    emit(ctx, &result, nothing)
}

fn handle_project_rm(ctx: &mut AppContext, code: &str, yes: bool) -> Result<()> {
    if !yes {
        let project = ctx.api.project(code)?;
        let preview = CmdResult::default().with_projects(vec![project]);
        emit(ctx, &preview, |r| {
            let images = r.projects.iter().map(|p| p.image_refs.len()).sum::<usize>();
            format!(
                "Would delete project and {} image(s):\n{}",
                images,
                render_projects(&r.projects)
            )
        })?;
        bail!("nothing deleted; pass --yes to confirm");
    }

    let result = ctx.api.delete_project(code)?;
    emit(ctx, &result, nothing)
}

fn handle_search(ctx: &AppContext, query: &str) -> Result<()> {
    let result = ctx.api.search(query)?;
    emit(ctx, &result, |r| render_hits(&r.hits))
}

fn handle_birthdays(ctx: &AppContext, on: chrono::NaiveDate) -> Result<()> {
    let result = ctx.api.birthdays(on)?;
    emit(ctx, &result, |r| {
        if r.clients.is_empty() {
            String::new()
        } else {
            render_clients(&r.clients)
        }
    })
}

fn handle_sweep(ctx: &AppContext, projects: bool) -> Result<()> {
    let result = ctx.api.sweep(projects)?;
    emit(ctx, &result, |r| render_paths(&r.paths))
}

/// Recorded image paths are absolute; relative input is taken from the root.
fn resolve(root: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        root.join(path)
    }
}

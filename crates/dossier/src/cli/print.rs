//! Terminal rendering of command results.
//!
//! Each `render_*` builds the full text so it can be tested without a
//! terminal; the handlers print it. Colors come from `colored`, which turns
//! itself off when stdout is not a TTY or `NO_COLOR` is set.

use colored::*;
use dossierapp::commands::{ClientProfile, CmdMessage, MessageLevel, ProjectProfile};
use dossierapp::model::{Client, Project, DATE_FORMAT};
use dossierapp::search::SearchHit;
use dossierapp::store::Table;
use std::path::PathBuf;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 32;
const CODE_WIDTH: usize = 14;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn render_clients(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients.\n".to_string();
    }
    let mut out = String::new();
    for client in clients {
        let birthday = client
            .birth_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        out.push_str(&format!(
            "  {}{}{}\n",
            pad(&client.id, CODE_WIDTH).yellow(),
            pad(&client.full_name(), NAME_WIDTH),
            birthday.dimmed()
        ));
    }
    out
}

pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects.\n".to_string();
    }
    let mut out = String::new();
    for project in projects {
        out.push_str(&format!(
            "  {}{}{}\n",
            pad(&project.order_code, CODE_WIDTH).yellow(),
            pad(&project.name, NAME_WIDTH),
            status(project).dimmed()
        ));
    }
    out
}

pub fn render_client_profile(profile: &ClientProfile) -> String {
    let client = &profile.client;
    let mut out = format!("{}  {}\n", client.full_name().bold(), client.id.yellow());
    out.push_str(&field("Address", client.address.as_deref().unwrap_or("-")));
    let birth = client
        .birth_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());
    out.push_str(&field("Birth date", &birth));
    out.push_str(&field("Image", &profile.display_image.display().to_string()));
    out.push_str(&format!("\n{}\n", "Projects".bold()));
    out.push_str(&render_projects(&profile.projects));
    out
}

/// `image` is a 1-based carousel position; it wraps like the carousel does.
pub fn render_project_profile(profile: &ProjectProfile, image: Option<usize>) -> String {
    let project = &profile.project;
    let mut out = format!("{}  {}\n", project.name.bold(), project.order_code.yellow());
    let owner = match (&profile.client, project.client_id.is_empty()) {
        (Some(client), _) => format!("{} ({})", client.full_name(), client.id),
        (None, true) => "-".to_string(),
        (None, false) => format!("{} (not found)", project.client_id),
    };
    out.push_str(&field("Client", &owner));
    out.push_str(&field(
        "Start",
        &project.start_date.format(DATE_FORMAT).to_string(),
    ));
    out.push_str(&field("Status", &status(project)));
    if !project.comments.is_empty() {
        out.push_str(&field("Comments", &project.comments));
    }

    if profile.images.is_empty() {
        out.push_str(&field("Images", &profile.placeholder.display().to_string()));
        return out;
    }
    match image {
        Some(n) => {
            let len = profile.images.len();
            let index = n.saturating_sub(1) % len;
            let carousel = profile.carousel(index);
            if let Some(path) = carousel.current(&profile.images) {
                out.push_str(&field(&carousel.label(), &path.display().to_string()));
            }
        }
        None => {
            out.push_str(&format!("{}\n", "Images".bold()));
            for path in &profile.images {
                out.push_str(&format!("  {}\n", path.display()));
            }
        }
    }
    out
}

pub fn render_hits(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    for hit in hits {
        let kind = match hit.kind {
            Table::Clients => "client ",
            Table::Projects => "project",
        };
        out.push_str(&format!(
            "  {} {}{}\n",
            kind.dimmed(),
            pad(&hit.code, CODE_WIDTH).yellow(),
            hit.name
        ));
    }
    out
}

pub fn render_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("{}\n", p.display()))
        .collect()
}

fn status(project: &Project) -> String {
    match project.end_date {
        Some(end) => format!("finished {}", end.format(DATE_FORMAT)),
        None => "in progress".to_string(),
    }
}

fn field(label: &str, value: &str) -> String {
    let label = format!("{:<12}", format!("{}:", label));
    format!("  {}{}\n", label.dimmed(), value)
}

/// Truncates to `width - 1` columns and pads to `width`.
fn pad(s: &str, width: usize) -> String {
    let shown = truncate_to_width(s, width.saturating_sub(1));
    let fill = width.saturating_sub(shown.width());
    format!("{}{}", shown, " ".repeat(fill))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

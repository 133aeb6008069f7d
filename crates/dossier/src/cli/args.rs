use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dossier", bin_name = "dossier", version)]
#[command(about = "Client and project records for a production workshop", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Working root; relative paths in the config resolve against it [default: current dir]
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub root: Option<PathBuf>,

    /// Config file to use instead of <root>/dossier.toml
    #[arg(long, global = true, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, help_heading = "Options")]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data and image directories
    Init,

    /// Show where tables and images are kept
    Paths,

    /// Register, view, edit and delete clients
    #[command(subcommand)]
    Client(ClientCommands),

    /// Register, view, edit and delete projects
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Search clients (name, last name, id) and projects (name, code)
    Search {
        query: String,
    },

    /// Clients whose birthday is today, or on the given date
    Birthdays {
        #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
        on: Option<NaiveDate>,
    },

    /// Delete image files no record refers to
    Sweep {
        /// Also sweep the project image directory
        #[arg(long)]
        projects: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClientCommands {
    /// Register a new client
    Add(ClientAddArgs),

    /// Client profile with its projects
    Show { id: String },

    /// The client's projects
    Projects { id: String },

    /// Edit a client; changing the id moves its projects along
    Edit(ClientEditArgs),

    /// Delete a client, its projects and all their images
    Rm {
        id: String,
        /// Actually delete; without it only the affected records are listed
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct ClientAddArgs {
    #[arg(long)]
    pub id: String,

    /// First name
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub birth_date: Option<NaiveDate>,

    /// Photo to attach (png, jpg, gif)
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ClientEditArgs {
    pub id: String,

    #[arg(long)]
    pub new_id: Option<String>,

    /// First name
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long, conflicts_with = "clear_address")]
    pub address: Option<String>,

    #[arg(long)]
    pub clear_address: bool,

    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date, conflicts_with = "clear_birth_date")]
    pub birth_date: Option<NaiveDate>,

    #[arg(long)]
    pub clear_birth_date: bool,

    /// Replace the photo
    #[arg(long, value_name = "FILE", conflicts_with = "remove_image")]
    pub image: Option<PathBuf>,

    /// Delete the photo
    #[arg(long)]
    pub remove_image: bool,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Register a new project
    Add(ProjectAddArgs),

    /// Project profile with owner and images
    Show {
        code: String,
        /// Show only the N-th image (1-based, wraps around)
        #[arg(long, value_name = "N")]
        image: Option<usize>,
    },

    /// Edit a project
    Edit(ProjectEditArgs),

    /// Delete a project and its images
    Rm {
        code: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
pub struct ProjectAddArgs {
    /// Order code (stored upper-cased)
    #[arg(long)]
    pub code: String,

    #[arg(long)]
    pub name: String,

    /// Owning client id
    #[arg(long, default_value = "")]
    pub client: String,

    /// Start date [default: today]
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// End date; leave out while the project is in progress
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    pub comments: String,

    /// Photo to attach; repeat for several
    #[arg(long = "image", value_name = "FILE")]
    pub images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ProjectEditArgs {
    pub code: String,

    #[arg(long)]
    pub new_code: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub client: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date, conflicts_with = "in_progress")]
    pub end: Option<NaiveDate>,

    /// Clear the end date
    #[arg(long)]
    pub in_progress: bool,

    #[arg(long)]
    pub comments: Option<String>,

    /// Photo to add; repeat for several
    #[arg(long = "add-image", value_name = "FILE")]
    pub add_images: Vec<PathBuf>,

    /// Recorded image path to delete; repeat for several
    #[arg(long = "remove-image", value_name = "PATH")]
    pub remove_images: Vec<PathBuf>,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    dossierapp::model::parse_date(s)?.ok_or_else(|| "date must not be empty".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_client_add_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dossier", "client", "add", "--id", "123", "--name", "Ana", "--birth-date",
            "1990-06-15", "--json", "-vv",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Client(ClientCommands::Add(args)) => {
                assert_eq!(args.id, "123");
                assert_eq!(args.last_name, "");
                assert_eq!(args.birth_date, NaiveDate::from_ymd_opt(1990, 6, 15));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(Cli::try_parse_from(["dossier", "birthdays", "--on", "15/06"]).is_err());
    }

    #[test]
    fn image_flags_conflict() {
        let parsed = Cli::try_parse_from([
            "dossier", "client", "edit", "1", "--image", "a.png", "--remove-image",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn project_images_repeat() {
        let cli = Cli::try_parse_from([
            "dossier", "project", "add", "--code", "op-1", "--name", "Mesa", "--image", "a.png",
            "--image", "b.jpg",
        ])
        .unwrap();
        match cli.command {
            Commands::Project(ProjectCommands::Add(args)) => assert_eq!(args.images.len(), 2),
            other => panic!("unexpected command {:?}", other),
        }
    }
}

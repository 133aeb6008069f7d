//! # CLI Behavior
//!
//! This is **one possible UI client** for dossier, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and
//! output formatting. For the overall architecture, see [`dossierapp`].
//!
//! ## Output
//!
//! Results go to stdout, as colored text or, with `--json`, as the command's
//! structured result. Logs go to stderr (`-v`, `-vv`, `-q`, or `RUST_LOG`).
//!
//! ## Deletes Ask First
//!
//! `client rm` and `project rm` without `--yes` list what would be removed
//! and exit with an error, leaving everything in place.
//!
//! ## Editing
//!
//! `client edit` and `project edit` start from the stored record and change
//! only the fields given. Passing `--new-id` to `client edit` renames the
//! client: its photo is renamed and its projects follow.
//!
//! ## Module Structure
//!
//! - `args`: Argument parsing via clap
//! - `handlers`: Context setup and one handler per command
//! - `print`: Text rendering of results

mod args;
mod handlers;
mod print;

pub use handlers::run;

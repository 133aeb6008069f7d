//! # Dossier CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/dossierapp/`: Core library with UI-agnostic business logic
//! - `crates/dossier/`: This CLI tool, depends on `dossierapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/dossier/src/cli/)                        │
//! │  - clap argument parsing (args.rs)                          │
//! │  - Context wiring + dispatch (handlers.rs)                  │
//! │  - Terminal rendering (print.rs)                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/dossierapp/src/api.rs)                   │
//! │  - Dispatches to command modules                            │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/dossierapp/src/commands/*)           │
//! │  - Business rules over the record store and image assets    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - **Commands**: unit tests in `dossierapp`, in-memory tables.
//! - **CLI parsing and rendering**: unit tests in `cli/args.rs` and `cli/print.rs`.
//! - **End to end**: `tests/cli_e2e.rs` runs the binary against a temp root.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

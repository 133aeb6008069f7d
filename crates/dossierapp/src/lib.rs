//! # Dossier Architecture
//!
//! Dossier keeps the records of a small production workshop: clients, the
//! projects made for them, and photos of both. Everything lives in two CSV
//! tables and two image directories on local disk.
//!
//! This crate is the UI-agnostic core. The `dossier` binary is one front end;
//! the navigation [`nav::Session`] exists so a page-based UI can be driven by
//! the same code.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Front end (the dossier CLI, or a page-based UI + nav)      │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: one method per operation                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation, cascades, rename propagation, sweeps         │
//! │  - Returns structured CmdResult                             │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                          │
//!                    ▼                          ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────┐
//! │  Record Store (store/)       │  │  Assets (assets.rs)      │
//! │  - Keyed tables over a       │  │  - Image files on disk   │
//! │    TableBackend (CSV / mem)  │  │                          │
//! └──────────────────────────────┘  └──────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns
//! `Result<CmdResult>`. It never prints and never exits the process. It does
//! emit `tracing` events; a front end chooses whether to show them via
//! [`logging::init_logging`].
//!
//! ## Consistency rules
//!
//! - Client ids are unique; project order codes are unique ignoring case.
//! - `Project.client_id` is a plain reference. It is not checked on save, so
//!   it may name a client that does not exist (a warning is reported).
//! - Deleting a client deletes its projects and all their images.
//! - Renaming a client moves its image file and reassigns its projects.
//!
//! None of this is transactional. Each step is a full rewrite of one table
//! or one file operation.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Table storage and its backends
//! - [`assets`]: Image storage, renaming, orphan sweep
//! - [`model`]: `Client`, `Project` and their CSV rows
//! - [`search`]: Linear substring search
//! - [`nav`]: Page session and image carousel for page-based UIs
//! - [`config`]: Layered configuration
//! - [`logging`]: Subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod assets;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod nav;
pub mod search;
pub mod store;

#[cfg(test)]
pub(crate) mod test_utils;

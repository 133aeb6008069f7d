//! Logging setup.
//!
//! The library only emits `tracing` events; nothing is printed unless a front
//! end installs a subscriber with [`init_logging`]. Output goes to stderr so
//! stdout stays free for command results.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Verbosity level for logging output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Warnings and errors.
    #[default]
    Normal,
    /// Record and file mutations (info).
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    /// Maps `-q` and a repeated `-v` count. `-q` wins.
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    #[must_use]
    pub fn to_level(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter directive covering the library and the CLI crate.
    pub fn directive(&self) -> String {
        let level = self.to_level();
        format!("dossierapp={level},dossier={level}")
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `verbosity`.
/// Calling it again is harmless: the first subscriber stays.
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

use std::io;

use appshelf_fetch::FetchError;
use thiserror::Error;

/// Why a trigger did not start an install.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("cannot overwrite the installer app ({package})")]
    SelfOverwrite { package: String },

    #[error("already installing {active}; {requested} was not started")]
    Busy { active: String, requested: String },
}

/// Failure reported by an installer capability.
#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("installer `{program}` not found: {source}")]
    NotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Failed(String),
}

/// Failure while staging an icon for the installer.
#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to access icon url: {0}")]
    Fetch(#[source] FetchError),

    #[error("failed to create temporary file: {0}")]
    Create(#[source] io::Error),

    #[error("failed to write icon data: {0}")]
    Write(#[source] io::Error),
}

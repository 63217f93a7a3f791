use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::InstallerError;

/// Toolkit command used to build and install packages.
pub const DEFAULT_PROGRAM: &str = "fyne";

/// Installs a package, optionally with an icon file.
///
/// Called from a blocking thread; implementations may run for a long time.
pub trait Installer: Send + Sync {
    fn install(&self, package: &str, icon: Option<&Path>) -> Result<(), InstallerError>;
}

impl<I: Installer + ?Sized> Installer for std::sync::Arc<I> {
    fn install(&self, package: &str, icon: Option<&Path>) -> Result<(), InstallerError> {
        (**self).install(package, icon)
    }
}

/// Runs `<program> get [-icon <path>] <package>`.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: PathBuf,
}

impl CommandInstaller {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolves `program` on `PATH`.
    pub fn locate(program: &str) -> Result<Self, InstallerError> {
        let path = which::which(program).map_err(|source| InstallerError::NotFound {
            program: program.to_string(),
            source,
        })?;
        debug!(program, path = %path.display(), "located installer");
        Ok(Self::new(path))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, package: &str, icon: Option<&Path>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("get");
        if let Some(icon) = icon {
            cmd.arg("-icon").arg(icon);
        }
        cmd.arg(package);
        cmd
    }
}

impl Installer for CommandInstaller {
    fn install(&self, package: &str, icon: Option<&Path>) -> Result<(), InstallerError> {
        let program = self.program.display().to_string();
        info!(%program, package, "running installer");

        let output = self
            .command(package, icon)
            .output()
            .map_err(|source| InstallerError::Spawn {
                program: program.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("`{program}` exited with {}", output.status)
        } else {
            stderr
        };
        Err(InstallerError::Failed(message))
    }
}

use std::fmt;
use std::path::PathBuf;

use appshelf_catalog::CatalogEntry;

/// One install attempt: what to install and which icon to stage for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallJob {
    pub package: String,
    pub icon_url: String,
}

impl InstallJob {
    pub fn new(package: impl Into<String>, icon_url: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            icon_url: icon_url.into(),
        }
    }
}

impl From<&CatalogEntry> for InstallJob {
    fn from(entry: &CatalogEntry) -> Self {
        Self::new(entry.package(), entry.icon())
    }
}

/// Coordinator state.
///
/// Progresses `Idle -> DownloadingIcon -> Installing -> Idle`; the terminal
/// success or failure is reported through [`InstallStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    DownloadingIcon { package: String },
    Installing { package: String },
}

impl Stage {
    pub fn is_idle(&self) -> bool {
        matches!(self, Stage::Idle)
    }

    /// Package of the active job, if any.
    pub fn package(&self) -> Option<&str> {
        match self {
            Stage::Idle => None,
            Stage::DownloadingIcon { package } | Stage::Installing { package } => Some(package),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "Idle"),
            Stage::DownloadingIcon { package } => write!(f, "Downloading icon for {package}"),
            Stage::Installing { package } => write!(f, "Installing {package}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The package is the installer app itself.
    SelfOverwrite { package: String },
    /// Another job is still running.
    Busy { active: String, requested: String },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::SelfOverwrite { .. } => write!(f, "Cannot overwrite the installer app"),
            RejectReason::Busy { active, requested } => {
                write!(f, "Already installing {active}, cannot start {requested}")
            }
        }
    }
}

/// A user-facing notice raised alongside a status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info { title: String, message: String },
    Error { message: String },
}

/// Progress and result updates emitted by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    Started { package: String },
    Succeeded { package: String },
    Failed { package: String, message: String },
    Rejected(RejectReason),
    /// The staged icon could not be removed. The install result stands.
    CleanupFailed { path: PathBuf, message: String },
}

impl InstallStatus {
    /// New text for the status line, when this update changes it.
    pub fn status_line(&self) -> Option<String> {
        match self {
            InstallStatus::Started { package } => Some(format!("Installing {package}...")),
            InstallStatus::Succeeded { package } => Some(format!("Installed {package}.")),
            InstallStatus::Failed { message, .. } => Some(message.clone()),
            InstallStatus::Rejected(_) | InstallStatus::CleanupFailed { .. } => None,
        }
    }

    /// Notice to raise for this update, if any.
    pub fn notification(&self) -> Option<Notification> {
        match self {
            InstallStatus::Started { .. } | InstallStatus::Succeeded { .. } => None,
            InstallStatus::Failed { message, .. } => Some(Notification::Error {
                message: message.clone(),
            }),
            InstallStatus::Rejected(reason @ RejectReason::SelfOverwrite { .. }) => {
                Some(Notification::Info {
                    title: "System app".to_string(),
                    message: reason.to_string(),
                })
            }
            InstallStatus::Rejected(reason @ RejectReason::Busy { .. }) => {
                Some(Notification::Info {
                    title: "Install in progress".to_string(),
                    message: reason.to_string(),
                })
            }
            InstallStatus::CleanupFailed { path, message } => Some(Notification::Error {
                message: format!("failed to remove {}: {message}", path.display()),
            }),
        }
    }
}

/// Result of a finished install attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { package: String },
    Failed { package: String, message: String },
}

impl InstallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InstallOutcome::Installed { .. })
    }

    pub fn package(&self) -> &str {
        match self {
            InstallOutcome::Installed { package } | InstallOutcome::Failed { package, .. } => package,
        }
    }

    pub(crate) fn status(&self) -> InstallStatus {
        match self {
            InstallOutcome::Installed { package } => InstallStatus::Succeeded {
                package: package.clone(),
            },
            InstallOutcome::Failed { package, message } => InstallStatus::Failed {
                package: package.clone(),
                message: message.clone(),
            },
        }
    }
}

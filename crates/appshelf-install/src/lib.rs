//! Install orchestration for catalog entries.
//!
//! [`InstallCoordinator`] runs one install at a time as a background task:
//! it stages the entry's icon in a temporary file, hands the package and icon
//! to an [`Installer`], removes the icon afterwards and reports every step to
//! a [`StatusSink`].
//!
//! The installer itself is opaque; [`CommandInstaller`] drives the toolkit's
//! `get` command.

mod coordinator;
mod data;
mod error;
mod icon;
mod installer;
mod sink;

pub use coordinator::{InstallCoordinator, SELF_PACKAGE};
pub use data::{InstallJob, InstallOutcome, InstallStatus, Notification, RejectReason, Stage};
pub use error::{IconError, InstallError, InstallerError};
pub use icon::download_icon;
pub use installer::{CommandInstaller, DEFAULT_PROGRAM, Installer};
pub use sink::StatusSink;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use appshelf_catalog::CatalogEntry;
use appshelf_fetch::{DEFAULT_TIMEOUT, HttpClient};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::data::{InstallJob, InstallOutcome, InstallStatus, RejectReason, Stage};
use crate::error::InstallError;
use crate::icon::stage_icon;
use crate::installer::Installer;
use crate::sink::StatusSink;

/// Package of the installer app itself; never reinstalled from the catalog.
pub const SELF_PACKAGE: &str = "fyne.io/apps";

/// Runs at most one install at a time in the background.
///
/// Cloning yields a handle onto the same coordinator.
pub struct InstallCoordinator<C> {
    client: Arc<C>,
    installer: Arc<dyn Installer>,
    self_package: String,
    icon_timeout: Duration,
    temp_dir: PathBuf,
    stage: Arc<Mutex<Stage>>,
}

impl<C> Clone for InstallCoordinator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            installer: Arc::clone(&self.installer),
            self_package: self.self_package.clone(),
            icon_timeout: self.icon_timeout,
            temp_dir: self.temp_dir.clone(),
            stage: Arc::clone(&self.stage),
        }
    }
}

impl<C: HttpClient + 'static> InstallCoordinator<C> {
    pub fn new(client: C, installer: impl Installer + 'static) -> Self {
        Self {
            client: Arc::new(client),
            installer: Arc::new(installer),
            self_package: SELF_PACKAGE.to_string(),
            icon_timeout: DEFAULT_TIMEOUT,
            temp_dir: std::env::temp_dir(),
            stage: Arc::new(Mutex::new(Stage::Idle)),
        }
    }

    pub fn self_package(mut self, package: impl Into<String>) -> Self {
        self.self_package = package.into();
        self
    }

    pub fn icon_timeout(mut self, timeout: Duration) -> Self {
        self.icon_timeout = timeout;
        self
    }

    /// Directory for staged icons. Defaults to the system temp dir.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn stage(&self) -> Stage {
        lock(&self.stage).clone()
    }

    pub fn is_busy(&self) -> bool {
        !lock(&self.stage).is_idle()
    }

    /// Starts installing `entry` in the background.
    ///
    /// Rejections are reported to `sink` and returned; nothing is spawned
    /// for them. Must be called from within a Tokio runtime.
    ///
    /// Aborting the returned handle stops status reporting but not an
    /// installer that is already running: the coordinator stays busy and the
    /// staged icon stays on disk until it returns.
    pub fn install<S>(
        &self,
        entry: &CatalogEntry,
        sink: S,
    ) -> Result<JoinHandle<InstallOutcome>, InstallError>
    where
        S: StatusSink + 'static,
    {
        self.start(InstallJob::from(entry), sink)
    }

    pub fn start<S>(&self, job: InstallJob, sink: S) -> Result<JoinHandle<InstallOutcome>, InstallError>
    where
        S: StatusSink + 'static,
    {
        if job.package == self.self_package {
            info!(package = %job.package, "refusing to reinstall the installer app");
            sink.report(InstallStatus::Rejected(RejectReason::SelfOverwrite {
                package: job.package.clone(),
            }));
            return Err(InstallError::SelfOverwrite {
                package: job.package,
            });
        }

        let idle = {
            let mut stage = lock(&self.stage);
            if let Some(active) = stage.package() {
                let active = active.to_string();
                drop(stage);
                info!(%active, requested = %job.package, "install already running");
                sink.report(InstallStatus::Rejected(RejectReason::Busy {
                    active: active.clone(),
                    requested: job.package.clone(),
                }));
                return Err(InstallError::Busy {
                    active,
                    requested: job.package,
                });
            }
            *stage = Stage::DownloadingIcon {
                package: job.package.clone(),
            };
            IdleOnDrop(Arc::clone(&self.stage))
        };

        let task = self.clone();
        Ok(tokio::spawn(async move { task.run(job, sink, idle).await }))
    }

    async fn run<S: StatusSink>(self, job: InstallJob, sink: S, idle: IdleOnDrop) -> InstallOutcome {
        let InstallJob { package, icon_url } = job;
        sink.report(InstallStatus::Started {
            package: package.clone(),
        });

        let icon = stage_icon(&*self.client, &icon_url, self.icon_timeout, &self.temp_dir).await;

        *lock(&self.stage) = Stage::Installing {
            package: package.clone(),
        };

        // The icon and the busy guard live on the blocking thread until the
        // installer returns, even if this task is aborted meanwhile.
        let installer = Arc::clone(&self.installer);
        let pkg = package.clone();
        let blocking = tokio::task::spawn_blocking(move || {
            let result = installer.install(&pkg, icon.as_deref());
            let cleanup = icon.and_then(|icon| {
                let path = icon.to_path_buf();
                icon.close().err().map(|e| (path, e))
            });
            (result, cleanup, idle)
        });

        let (outcome, idle) = match blocking.await {
            Ok((result, cleanup, idle)) => {
                if let Some((path, e)) = cleanup {
                    warn!(path = %path.display(), error = %e, "failed to remove staged icon");
                    sink.report(InstallStatus::CleanupFailed {
                        path,
                        message: e.to_string(),
                    });
                }
                let outcome = match result {
                    Ok(()) => {
                        info!(%package, "installed");
                        InstallOutcome::Installed { package }
                    }
                    Err(e) => {
                        warn!(%package, error = %e, "install failed");
                        InstallOutcome::Failed {
                            package,
                            message: e.to_string(),
                        }
                    }
                };
                (outcome, Some(idle))
            }
            // A panicking installer already released the icon and the guard
            // while unwinding.
            Err(e) => {
                warn!(%package, error = %e, "installer task aborted");
                let outcome = InstallOutcome::Failed {
                    package,
                    message: format!("installer did not finish: {e}"),
                };
                (outcome, None)
            }
        };

        drop(idle);
        sink.report(outcome.status());
        outcome
    }
}

/// Returns the coordinator to `Idle` however the task ends.
struct IdleOnDrop(Arc<Mutex<Stage>>);

impl Drop for IdleOnDrop {
    fn drop(&mut self) {
        *lock(&self.0) = Stage::Idle;
    }
}

fn lock(stage: &Mutex<Stage>) -> MutexGuard<'_, Stage> {
    stage.lock().unwrap_or_else(PoisonError::into_inner)
}

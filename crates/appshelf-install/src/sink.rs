use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::data::InstallStatus;

/// Receives coordinator updates; the presentation layer consumes them.
pub trait StatusSink: Send + Sync {
    fn report(&self, status: InstallStatus);
}

impl StatusSink for UnboundedSender<InstallStatus> {
    fn report(&self, status: InstallStatus) {
        if let Err(e) = self.send(status) {
            debug!(status = ?e.0, "status receiver dropped");
        }
    }
}

impl<S: StatusSink + ?Sized> StatusSink for Arc<S> {
    fn report(&self, status: InstallStatus) {
        (**self).report(status)
    }
}

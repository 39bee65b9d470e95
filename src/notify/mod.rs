use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use log::{info, warn};

/// Stable id shared by every temperature notification; repeated requests
/// re-display instead of stacking.
pub const NOTIFICATION_ID: u32 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Where notification requests end up. The actual system notification
/// display is the host platform's job; the headless build logs them.
pub trait NotificationSink: Send + Sync {
    fn post(&self, id: u32, notification: &Notification) -> Result<()>;
}

pub struct LogSink;

impl NotificationSink for LogSink {
    fn post(&self, id: u32, notification: &Notification) -> Result<()> {
        info!(
            "[notification {id}] {}: {}",
            notification.title, notification.body
        );
        Ok(())
    }
}

/// Notification permission, granted or revoked out-of-band by the host.
#[derive(Clone)]
pub struct PermissionHandle(Arc<AtomicBool>);

impl PermissionHandle {
    pub fn new(granted: bool) -> Self {
        Self(Arc::new(AtomicBool::new(granted)))
    }

    pub fn grant(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn revoke(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn granted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    permission: PermissionHandle,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, permission: PermissionHandle) -> Self {
        Self { sink, permission }
    }

    /// Dispatch a notification request. Requests without permission are
    /// dropped and logged, never queued or retried; sink failures are
    /// logged but not propagated.
    pub fn dispatch(&self, notification: Notification) {
        if !self.permission.granted() {
            info!("Failed to send notification - permissions not granted");
            return;
        }

        if let Err(err) = self.sink.post(NOTIFICATION_ID, &notification) {
            warn!("Notification sink failed: {err:#}");
        } else {
            info!("Notification sent");
        }
    }
}

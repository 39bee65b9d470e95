use anyhow::{Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::notify::Notifier;

use super::loop_worker::sensing_loop;
use super::source::SensorFeed;

/// Owns the sensing task lifecycle. Starting is idempotent (a second start
/// never registers a duplicate subscription) and stopping an idle
/// controller is a no-op.
pub struct SensorController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SensorController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn start(&mut self, feed: SensorFeed, notifier: Notifier) {
        if self.handle.is_some() {
            info!("Sensing already active, ignoring start");
            return;
        }

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(sensing_loop(feed, notifier, token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        info!("Sensing started");
    }

    /// Cancels future reading delivery immediately; notifications already
    /// dispatched are not revoked.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sensing loop task failed to join")
                .map(|_| ())
        } else {
            Ok(())
        }
    }
}

impl Default for SensorController {
    fn default() -> Self {
        Self::new()
    }
}

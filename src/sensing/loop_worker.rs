use tokio_util::sync::CancellationToken;

use crate::notify::Notifier;

use super::source::SensorFeed;
use super::watcher::TemperatureWatcher;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

// Import the logging macros (exported at crate root)
use crate::log_info;

/// Drains the sensor feed until cancelled or the source goes away.
///
/// Readings are handled strictly in delivery order: every decision depends
/// on the watcher state left behind by the previous one. The watcher is
/// created here, so a restarted loop always begins from the idle state.
pub async fn sensing_loop(
    mut feed: SensorFeed,
    notifier: Notifier,
    cancel_token: CancellationToken,
) {
    let mut watcher = TemperatureWatcher::new();

    loop {
        tokio::select! {
            reading = feed.next() => {
                match reading {
                    Some(value) => {
                        log_info!("Received value: {value}");
                        if let Some(notification) = watcher.on_reading(value) {
                            notifier.dispatch(notification);
                        }
                    }
                    None => {
                        log_info!("sensor feed closed, sensing loop exiting");
                        break;
                    }
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("sensing loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::Result;

    use crate::notify::{Notification, NotificationSink, PermissionHandle};

    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        bodies: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn post(&self, _id: u32, notification: &Notification) -> Result<()> {
            self.bodies.lock().unwrap().push(notification.body.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn readings_flow_through_to_notifications_in_order() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), PermissionHandle::new(true));
        let (tx, feed) = SensorFeed::channel(16);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(sensing_loop(feed, notifier, cancel.clone()));

        for value in [20.0f32, 21.5, 22.1, 19.9, 25.0] {
            tx.send(value).await.unwrap();
        }
        drop(tx); // closing the feed lets the loop finish draining
        handle.await.unwrap();

        let bodies = sink.bodies.lock().unwrap();
        assert_eq!(
            *bodies,
            vec![
                "Current ambient temperature is 21.5 C".to_string(),
                "Current ambient temperature is 25 C".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn cancellation_stops_delivery() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), PermissionHandle::new(true));
        let (tx, feed) = SensorFeed::channel(16);
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(sensing_loop(feed, notifier, cancel.clone()));
        cancel.cancel();
        handle.await.unwrap();

        // The loop is gone; the sender eventually observes the closed feed
        tx.closed().await;
        assert!(sink.bodies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unavailable_sensor_produces_nothing() {
        let sink = Arc::new(RecordingSink::default());
        let notifier = Notifier::new(sink.clone(), PermissionHandle::new(true));
        let cancel = CancellationToken::new();

        let handle = tokio::spawn(sensing_loop(
            SensorFeed::unavailable(),
            notifier,
            cancel.clone(),
        ));

        // Give the loop a chance to (incorrectly) emit something
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(sink.bodies.lock().unwrap().is_empty());
    }
}

use tokio::sync::mpsc;

/// Stream of raw temperature readings from the platform sensor service.
///
/// The cadence is whatever the producer delivers; nothing here assumes a
/// fixed period. A device without a suitable sensor is represented by a
/// feed that never yields, which leaves the watcher idle forever.
pub struct SensorFeed {
    rx: mpsc::Receiver<f32>,
    // Held so an `unavailable` feed never observes a closed channel.
    _keepalive: Option<mpsc::Sender<f32>>,
}

impl SensorFeed {
    /// Feed driven by the returned sender. Dropping the sender ends the
    /// stream, which the sensing loop treats as the source going away.
    pub fn channel(capacity: usize) -> (mpsc::Sender<f32>, SensorFeed) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            tx,
            SensorFeed {
                rx,
                _keepalive: None,
            },
        )
    }

    /// Feed for a device with no matching sensor: never yields a reading.
    pub fn unavailable() -> SensorFeed {
        let (tx, rx) = mpsc::channel(1);
        SensorFeed {
            rx,
            _keepalive: Some(tx),
        }
    }

    /// Next reading, or `None` once the producer is gone.
    pub async fn next(&mut self) -> Option<f32> {
        self.rx.recv().await
    }
}

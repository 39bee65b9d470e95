use crate::notify::Notification;

/// Minimum move, in degrees, from the last-notified reading before another
/// notification is raised.
pub const NOTIFY_THRESHOLD_DEGREES: f32 = 2.0;

/// Turns the raw ambient-temperature stream into the much sparser stream of
/// notification requests. Holds only the two values the decision needs; the
/// state is owned by whichever loop drives it and dies with that loop.
#[derive(Debug, Default)]
pub struct TemperatureWatcher {
    last_reading: Option<f32>,
    last_notified: Option<f32>,
}

impl TemperatureWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one raw reading, returning the notification to raise, if any.
    ///
    /// The first reading after construction only establishes the baseline:
    /// there is nothing to compare against yet, and notifying would fire
    /// merely because listening started. After that, a notification is due
    /// whenever no reading has been notified yet, or the value has moved at
    /// least [`NOTIFY_THRESHOLD_DEGREES`] away from the last-notified one.
    pub fn on_reading(&mut self, value: f32) -> Option<Notification> {
        let do_notify = match (self.last_reading, self.last_notified) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(_), Some(notified)) => (notified - value).abs() >= NOTIFY_THRESHOLD_DEGREES,
        };

        self.last_reading = Some(value);

        if do_notify {
            self.last_notified = Some(value);
            Some(Notification {
                title: "Temperature changed".to_string(),
                body: format!("Current ambient temperature is {value} C"),
            })
        } else {
            None
        }
    }

    pub fn last_reading(&self) -> Option<f32> {
        self.last_reading
    }

    pub fn last_notified(&self) -> Option<f32> {
        self.last_notified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_never_notifies() {
        for value in [20.0, -40.0, 0.0, 999.5] {
            let mut watcher = TemperatureWatcher::new();
            assert!(watcher.on_reading(value).is_none());
            assert_eq!(watcher.last_reading(), Some(value));
            assert_eq!(watcher.last_notified(), None);
        }
    }

    #[test]
    fn second_reading_notifies_when_never_notified_before() {
        let mut watcher = TemperatureWatcher::new();
        assert!(watcher.on_reading(20.0).is_none());

        // Even a tiny move notifies: there is no last-notified baseline yet
        let notification = watcher.on_reading(20.1).expect("should notify");
        assert_eq!(notification.title, "Temperature changed");
        assert_eq!(notification.body, "Current ambient temperature is 20.1 C");
        assert_eq!(watcher.last_notified(), Some(20.1));
    }

    #[test]
    fn below_threshold_moves_stay_quiet() {
        let mut watcher = TemperatureWatcher::new();
        watcher.on_reading(20.0);
        watcher.on_reading(21.5); // notifies, baseline 21.5

        assert!(watcher.on_reading(22.1).is_none()); // |21.5 - 22.1| = 0.6
        assert!(watcher.on_reading(19.9).is_none()); // |21.5 - 19.9| = 1.6
        assert_eq!(watcher.last_notified(), Some(21.5));
        assert_eq!(watcher.last_reading(), Some(19.9));
    }

    #[test]
    fn threshold_move_notifies_in_both_directions() {
        let mut watcher = TemperatureWatcher::new();
        watcher.on_reading(20.0);
        watcher.on_reading(20.0); // baseline 20.0

        assert!(watcher.on_reading(22.0).is_some()); // exactly +2
        assert!(watcher.on_reading(20.0).is_some()); // exactly -2 from 22.0
        assert_eq!(watcher.last_notified(), Some(20.0));
    }

    #[test]
    fn comparison_is_against_last_notified_not_last_reading() {
        let mut watcher = TemperatureWatcher::new();
        watcher.on_reading(20.0);
        watcher.on_reading(20.0); // baseline 20.0

        // Creep upward in sub-threshold steps; each step is < 2 from the
        // previous reading but the cumulative drift crosses the threshold.
        assert!(watcher.on_reading(21.0).is_none());
        assert!(watcher.on_reading(21.9).is_none());
        assert!(watcher.on_reading(22.5).is_some());
    }

    #[test]
    fn tracking_follows_every_reading() {
        let mut watcher = TemperatureWatcher::new();
        let readings = [20.0f32, 21.5, 22.1, 19.9, 25.0, 25.0];
        let mut notified_values = Vec::new();

        for value in readings {
            if watcher.on_reading(value).is_some() {
                notified_values.push(value);
            }
            assert_eq!(watcher.last_reading(), Some(value));
            if let Some(notified) = watcher.last_notified() {
                // Never interpolated: always a value that was actually read
                assert!(readings.contains(&notified));
            }
        }

        assert_eq!(notified_values, vec![21.5, 25.0]);
    }
}

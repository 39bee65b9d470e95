pub mod avatar;
pub mod db;
pub mod notify;
pub mod profile;
pub mod sensing;
pub mod settings;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use db::Database;
use notify::{LogSink, Notifier, PermissionHandle};
use profile::ProfileStore;
use sensing::{SensorController, SensorFeed};
use settings::{ListenerSettings, SettingsStore};

/// Cap enforced at the edit boundary, matching the profile screen's field.
const USERNAME_MAX_CHARS: usize = 20;

/// Normalize a username edit: surrounding whitespace stripped, empty and
/// over-long input rejected. The store itself never validates.
fn sanitize_username(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.chars().count() > USERNAME_MAX_CHARS {
        return None;
    }
    Some(trimmed.to_string())
}

struct App {
    profile: ProfileStore,
    settings: SettingsStore,
    notifier: Notifier,
    permission: PermissionHandle,
    controller: SensorController,
    sensor_tx: mpsc::Sender<f32>,
}

impl App {
    /// Single initialization point: everything is constructed here and
    /// injected explicitly, no lazily-created globals.
    async fn bootstrap(data_dir: std::path::PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;

        let database = Database::new(data_dir.join("tempwatch.sqlite3"))?;
        let profile = ProfileStore::new(database).await?;
        let settings = SettingsStore::new(data_dir.join("settings.json"))?;

        let permission = PermissionHandle::new(true);
        let notifier = Notifier::new(Arc::new(LogSink), permission.clone());

        let mut controller = SensorController::new();
        let (sensor_tx, feed) = SensorFeed::channel(16);
        controller.start(feed, notifier.clone());

        Ok(Self {
            profile,
            settings,
            notifier,
            permission,
            controller,
            sensor_tx,
        })
    }

    async fn handle_line(&mut self, line: &str) -> Result<()> {
        let (command, rest) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => {}
            "temp" => match rest.parse::<f32>() {
                Ok(value) if value.is_finite() => {
                    if self.sensor_tx.send(value).await.is_err() {
                        info!("Sensor listener is stopped, reading dropped");
                    }
                }
                _ => warn!("usage: temp <finite number>"),
            },
            "name" => match sanitize_username(rest) {
                Some(username) => {
                    let user_image = self.profile.current().and_then(|row| row.user_image);
                    let row = self.profile.upsert(Some(username), user_image).await?;
                    info!("Saved username {:?}", row.username);
                }
                None => warn!("username must be 1-{USERNAME_MAX_CHARS} chars after trimming"),
            },
            "avatar" => {
                if rest.is_empty() {
                    warn!("usage: avatar <reference>");
                } else {
                    let username = self.profile.current().and_then(|row| row.username);
                    let row = self.profile.upsert(username, Some(rest.to_string())).await?;
                    info!("Saved avatar ref {:?}", row.user_image);
                }
            }
            "profile" => match self.profile.current() {
                Some(row) => {
                    let avatar_bytes = avatar::load_avatar(row.user_image.as_deref());
                    info!(
                        "Profile: username={:?} image={:?} ({} avatar bytes)",
                        row.username,
                        row.user_image,
                        avatar_bytes.len()
                    );
                }
                None => info!("Profile: not set up yet"),
            },
            "grant" => {
                self.permission.grant();
                info!("Permissions granted");
            }
            "deny" => {
                self.permission.revoke();
                info!("Permissions not granted");
            }
            "policy" => match rest {
                "on" | "off" => {
                    self.settings.update_listener(ListenerSettings {
                        background_listening: rest == "on",
                    })?;
                    info!("Background listening set to {rest}");
                }
                _ => warn!("usage: policy <on|off>"),
            },
            "background" => {
                if self.settings.listener().background_listening {
                    info!("NOT pausing sensor listener");
                } else {
                    info!("Pausing sensor listener");
                    self.controller.stop().await?;
                }
            }
            "foreground" => {
                info!("Resuming sensor listener");
                if !self.controller.is_running() {
                    let (tx, feed) = SensorFeed::channel(16);
                    self.sensor_tx = tx;
                    self.controller.start(feed, self.notifier.clone());
                }
            }
            other => warn!("unknown command: {other}"),
        }

        Ok(())
    }
}

/// Headless entry point. Stdin stands in for the UI host and the device
/// sensor: `temp <v>` feeds a reading, `name`/`avatar`/`profile` drive the
/// profile store, `grant`/`deny` flip notification permission, and
/// `background`/`foreground` exercise the listener policy.
pub async fn run() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("tempwatch starting up...");

    let data_dir = dirs::data_dir()
        .context("failed to resolve platform data directory")?
        .join("tempwatch");
    let mut app = App::bootstrap(data_dir).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        // A failed command (say, the row store refusing a write) is a
        // transient failure to show the user, not a reason to exit
        if let Err(err) = app.handle_line(&line).await {
            warn!("Command failed: {err:#}");
        }
    }

    app.controller.stop().await?;
    info!("tempwatch shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn app_in(dir: &tempfile::TempDir) -> (Database, App) {
        let db = Database::new(dir.path().join("app.sqlite3")).unwrap();
        let profile = ProfileStore::new(db.clone()).await.unwrap();
        let settings = SettingsStore::new(dir.path().join("settings.json")).unwrap();

        let permission = PermissionHandle::new(true);
        let notifier = Notifier::new(Arc::new(LogSink), permission.clone());

        let mut controller = SensorController::new();
        let (sensor_tx, feed) = SensorFeed::channel(16);
        controller.start(feed, notifier.clone());

        (
            db,
            App {
                profile,
                settings,
                notifier,
                permission,
                controller,
                sensor_tx,
            },
        )
    }

    #[tokio::test]
    async fn failed_write_is_surfaced_but_leaves_the_shell_usable() {
        let dir = tempfile::tempdir().unwrap();
        let (db, mut app) = app_in(&dir).await;

        app.handle_line("name alice").await.unwrap();

        // Knock the storage out from under the store
        db.execute(|conn| {
            conn.execute("DROP TABLE user", [])?;
            Ok(())
        })
        .await
        .unwrap();

        // The write fails and the error reaches the caller...
        assert!(app.handle_line("name bob").await.is_err());

        // ...but nothing else is torn down: other commands keep working
        app.handle_line("temp 20").await.unwrap();
        app.handle_line("profile").await.unwrap();
        assert_eq!(app.profile.current().unwrap().username.as_deref(), Some("alice"));

        app.controller.stop().await.unwrap();
    }

    #[test]
    fn sanitize_trims_surrounding_whitespace() {
        assert_eq!(sanitize_username("  alice  "), Some("alice".to_string()));
    }

    #[test]
    fn sanitize_rejects_blank_and_overlong_input() {
        assert_eq!(sanitize_username("   "), None);
        assert_eq!(sanitize_username(&"x".repeat(21)), None);
        assert_eq!(sanitize_username(&"x".repeat(20)), Some("x".repeat(20)));
    }
}

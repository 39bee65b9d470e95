use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Whether the sensor subscription stays alive while the host is in the
/// background. The default keeps listening, so temperature notifications
/// fire even when the app is not in the foreground.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerSettings {
    pub background_listening: bool,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            background_listening: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct UserSettings {
    listener: ListenerSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn listener(&self) -> ListenerSettings {
        self.data.read().unwrap().listener.clone()
    }

    pub fn update_listener(&self, settings: ListenerSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            guard.listener = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

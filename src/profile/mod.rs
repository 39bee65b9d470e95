use anyhow::Result;
use thiserror::Error;
use tokio::sync::watch;

use crate::db::{Database, UserProfile};

/// The persistence layer could not serve a read or commit a write. Not
/// retried internally; callers decide what to show the user.
#[derive(Debug, Error)]
#[error("profile storage unavailable")]
pub struct StorageError(#[from] anyhow::Error);

/// Reactive view over the single user row.
///
/// The row itself lives in the database; this store mirrors it into a
/// watch channel so the UI host can observe it continuously. Observers
/// always see either the fully-old or fully-new row, and the new row is
/// published before an `upsert` call returns.
pub struct ProfileStore {
    db: Database,
    tx: watch::Sender<Option<UserProfile>>,
}

impl ProfileStore {
    /// Builds the store, seeding observers with whatever row exists.
    pub async fn new(db: Database) -> Result<Self, StorageError> {
        let current = db.get_user().await?;
        let (tx, _rx) = watch::channel(current);
        Ok(Self { db, tx })
    }

    /// Continuous observation of the row: the receiver holds the current
    /// value immediately and is notified on every subsequent change. `None`
    /// means no row has been written yet.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.tx.borrow().clone()
    }

    /// Replace the row's fields, writing through to storage. Validation
    /// (trimming, length cap) belongs to the edit boundary, not here; the
    /// given values are stored as-is.
    pub async fn upsert(
        &self,
        username: Option<String>,
        user_image: Option<String>,
    ) -> Result<UserProfile, StorageError> {
        let row = self.db.upsert_user(username, user_image).await?;
        // Publish before returning so every observer can see the committed
        // row by the time the caller's await completes.
        self.tx.send_replace(Some(row.clone()));
        Ok(row)
    }
}

use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};

use crate::db::{
    connection::Database,
    models::{UserProfile, USER_ROW_ID},
};

fn row_to_user_profile(row: &Row) -> Result<UserProfile, rusqlite::Error> {
    Ok(UserProfile {
        id: row.get("id")?,
        username: row.get("username")?,
        user_image: row.get("user_image")?,
    })
}

impl Database {
    /// Get the single user row, if one has been written yet.
    pub async fn get_user(&self) -> Result<Option<UserProfile>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, user_image
                 FROM user
                 WHERE id = ?1",
            )?;

            let result = stmt
                .query_row(params![USER_ROW_ID], row_to_user_profile)
                .optional()?;

            Ok(result)
        })
        .await
    }

    /// Insert or update the single user row. Every write targets the
    /// constant id, so a second row can never appear.
    pub async fn upsert_user(
        &self,
        username: Option<String>,
        user_image: Option<String>,
    ) -> Result<UserProfile> {
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO user (id, username, user_image)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                     username = excluded.username,
                     user_image = excluded.user_image",
                params![USER_ROW_ID, username, user_image],
            )?;

            // Fetch the row back so callers see exactly what was stored
            let mut stmt = conn.prepare(
                "SELECT id, username, user_image
                 FROM user
                 WHERE id = ?1",
            )?;

            let result = stmt.query_row(params![USER_ROW_ID], row_to_user_profile)?;

            Ok(result)
        })
        .await
    }
}

use serde::{Deserialize, Serialize};

/// The profile table holds at most one row, always under this id.
pub const USER_ROW_ID: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    /// Display name; trimmed and capped at 20 chars by the edit boundary.
    pub username: Option<String>,
    /// Opaque reference to an externally stored avatar image. `None` means
    /// the default avatar.
    pub user_image: Option<String>,
}

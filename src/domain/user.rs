use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Opaque credential digest; hashing itself happens outside this crate.
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub about_me: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Max length of the free-text bio, in characters.
pub const MAX_ABOUT_ME_LEN: usize = 140;

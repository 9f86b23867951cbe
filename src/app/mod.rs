pub mod feed;
pub mod posts;
pub mod social;
pub mod users;

use uuid::Uuid;

use crate::error::{Error, Result};

/// Resolves a user identity or fails with `UserNotFound`. Runs on whatever
/// executor the caller is mid-flight with (pool or open transaction).
pub(crate) async fn ensure_user<'e, E>(executor: E, user_id: Uuid) -> Result<()>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?1)")
        .bind(user_id)
        .fetch_one(executor)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(Error::UserNotFound(user_id))
    }
}

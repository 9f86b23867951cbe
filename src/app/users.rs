use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::user::{User, MAX_ABOUT_ME_LEN};
use crate::error::{Error, Result};
use crate::infra::db::{timestamp_as_db, timestamp_from_db, Db};

#[derive(Clone)]
pub struct UserService {
    db: Db,
}

impl UserService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Registration write. The caller supplies an already-hashed credential
    /// (or none, for externally authenticated accounts).
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<String>,
    ) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            about_me: None,
            last_seen: OffsetDateTime::now_utc(),
            created_at: OffsetDateTime::now_utc(),
        };

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, about_me, last_seen, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.about_me)
        .bind(timestamp_as_db(user.last_seen))
        .bind(timestamp_as_db(user.created_at))
        .execute(self.db.pool())
        .await
        .map_err(|err| Error::from_unique(err, "username or email"))?;

        tracing::debug!(user_id = %user.id, username, "user registered");
        Ok(user)
    }

    pub async fn user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, about_me, last_seen, created_at \
             FROM users WHERE id = ?1",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, about_me, last_seen, created_at \
             FROM users WHERE username = ?1",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| user_from_row(&row)))
    }

    /// Profile edit. `None` fields keep their current value.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        username: Option<String>,
        about_me: Option<String>,
    ) -> Result<User> {
        if let Some(about_me) = &about_me {
            if about_me.chars().count() > MAX_ABOUT_ME_LEN {
                return Err(Error::ValidationRejected("about_me exceeds 140 characters"));
            }
        }

        let result = sqlx::query(
            "UPDATE users \
             SET username = COALESCE(?2, username), \
                 about_me = COALESCE(?3, about_me) \
             WHERE id = ?1",
        )
        .bind(user_id)
        .bind(username)
        .bind(about_me)
        .execute(self.db.pool())
        .await
        .map_err(|err| Error::from_unique(err, "username"))?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(user_id));
        }

        self.user_by_id(user_id)
            .await?
            .ok_or(Error::UserNotFound(user_id))
    }

    /// Last-activity tracking. Takes the caller's connection so the write can
    /// share a transaction (and commit) with whatever triggered it.
    pub async fn touch_last_seen(&self, conn: &mut SqliteConnection, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE users SET last_seen = ?2 WHERE id = ?1")
            .bind(user_id)
            .bind(timestamp_as_db(OffsetDateTime::now_utc()))
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound(user_id));
        }
        Ok(())
    }
}

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        about_me: row.get("about_me"),
        last_seen: timestamp_from_db(row.get("last_seen")),
        created_at: timestamp_from_db(row.get("created_at")),
    }
}

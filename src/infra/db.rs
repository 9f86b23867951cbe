use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use time::OffsetDateTime;

use crate::config::AppConfig;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users ( \
         id BLOB PRIMARY KEY, \
         username TEXT NOT NULL UNIQUE, \
         email TEXT NOT NULL UNIQUE, \
         password_hash TEXT, \
         about_me TEXT, \
         last_seen INTEGER NOT NULL, \
         created_at INTEGER NOT NULL \
     )",
    "CREATE TABLE IF NOT EXISTS posts ( \
         id BLOB PRIMARY KEY, \
         author_id BLOB NOT NULL REFERENCES users(id), \
         body TEXT NOT NULL, \
         created_at INTEGER NOT NULL \
     )",
    "CREATE INDEX IF NOT EXISTS idx_posts_author_created \
     ON posts(author_id, created_at DESC)",
    "CREATE TABLE IF NOT EXISTS follows ( \
         follower_id BLOB NOT NULL REFERENCES users(id), \
         followee_id BLOB NOT NULL REFERENCES users(id), \
         created_at INTEGER NOT NULL, \
         PRIMARY KEY (follower_id, followee_id) \
     )",
    "CREATE INDEX IF NOT EXISTS idx_follows_followee ON follows(followee_id)",
];

/// Timestamps persist as unix nanoseconds. Integer comparison in SQL then
/// matches chronological order exactly; text encodings of subsecond values
/// do not sort lexicographically.
pub fn timestamp_as_db(ts: OffsetDateTime) -> i64 {
    ts.unix_timestamp_nanos() as i64
}

pub fn timestamp_from_db(nanos: i64) -> OffsetDateTime {
    // i64 nanoseconds only reach the years 1677..=2262, all representable.
    OffsetDateTime::from_unix_timestamp_nanos(nanos as i128)
        .expect("i64 nanoseconds are in range")
}

#[derive(Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.db_idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.db_max_lifetime_seconds))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

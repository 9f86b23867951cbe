#![allow(dead_code)]

use std::sync::Once;

use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use tern::config::AppConfig;
use tern::domain::post::Post;
use tern::domain::user::User;
use tern::infra::db::{timestamp_as_db, Db};
use tern::AppState;

static INIT_TRACING: Once = Once::new();

/// Fresh app over a private in-memory store. One connection keeps every
/// handle on the same SQLite database.
pub async fn app() -> AppState {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });

    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        db_connect_timeout_seconds: 5,
        db_idle_timeout_seconds: 300,
        db_max_lifetime_seconds: 1800,
    };
    let db = Db::connect(&config).await.expect("connect in-memory store");
    AppState::new(db)
}

pub async fn create_user(app: &AppState, username: &str) -> User {
    app.users
        .create_user(username, &format!("{username}@example.com"), None)
        .await
        .expect("create user")
}

/// Follow inside its own transaction, committed the way a route handler would.
pub async fn follow(app: &AppState, follower: Uuid, followee: Uuid) -> tern::Result<bool> {
    let mut tx = app.db.pool().begin().await.expect("begin");
    let created = app.social.follow(&mut tx, follower, followee).await?;
    tx.commit().await.expect("commit");
    Ok(created)
}

pub async fn unfollow(app: &AppState, follower: Uuid, followee: Uuid) -> tern::Result<bool> {
    let mut tx = app.db.pool().begin().await.expect("begin");
    let removed = app.social.unfollow(&mut tx, follower, followee).await?;
    tx.commit().await.expect("commit");
    Ok(removed)
}

/// Base instant for tests that need explicit, whole-second timestamps.
pub fn base_time() -> OffsetDateTime {
    datetime!(2024-05-01 12:00:00 UTC)
}

pub fn base_plus(seconds: i64) -> OffsetDateTime {
    base_time() + Duration::seconds(seconds)
}

pub fn base_plus_millis(milliseconds: i64) -> OffsetDateTime {
    base_time() + Duration::milliseconds(milliseconds)
}

/// Inserts a post with a chosen timestamp, bypassing the service clock.
pub async fn insert_post_at(
    app: &AppState,
    author_id: Uuid,
    body: &str,
    created_at: OffsetDateTime,
) -> Post {
    let post = Post {
        id: Uuid::new_v4(),
        author_id,
        body: body.to_string(),
        created_at,
    };
    sqlx::query("INSERT INTO posts (id, author_id, body, created_at) VALUES (?1, ?2, ?3, ?4)")
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.body)
        .bind(timestamp_as_db(post.created_at))
        .execute(app.db.pool())
        .await
        .expect("insert post");
    post
}

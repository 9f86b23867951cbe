use sqlx::{Row, SqliteConnection};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::ensure_user;
use crate::domain::social_graph::Follow;
use crate::domain::user::User;
use crate::error::{Error, Result};
use crate::infra::db::{timestamp_as_db, timestamp_from_db, Db};

#[derive(Clone)]
pub struct SocialService {
    db: Db,
}

/// A graph neighbor plus when the edge was created.
#[derive(Debug, Clone)]
pub struct SocialUserEdge {
    pub user: User,
    pub followed_at: OffsetDateTime,
}

impl SocialService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Inserts the follow edge if absent; returns whether a new edge was
    /// created. Already-following is a benign `false`, including when a
    /// concurrent writer won the race: the composite primary key plus
    /// `ON CONFLICT DO NOTHING` makes the second insert a no-op.
    ///
    /// Mutations run on the caller's connection; the caller owns the
    /// transaction and the commit, so this write can batch with others.
    pub async fn follow(
        &self,
        conn: &mut SqliteConnection,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<bool> {
        if follower_id == followee_id {
            return Err(Error::ValidationRejected("cannot follow yourself"));
        }
        ensure_user(&mut *conn, follower_id).await?;
        ensure_user(&mut *conn, followee_id).await?;

        let result = sqlx::query(
            "INSERT INTO follows (follower_id, followee_id, created_at) \
             VALUES (?1, ?2, ?3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(follower_id)
        .bind(followee_id)
        .bind(timestamp_as_db(OffsetDateTime::now_utc()))
        .execute(&mut *conn)
        .await?;

        let created = result.rows_affected() > 0;
        if created {
            tracing::debug!(%follower_id, %followee_id, "follow edge created");
        }
        Ok(created)
    }

    /// Deletes the follow edge if present; returns whether one was removed.
    /// Not-following is a benign `false`.
    pub async fn unfollow(
        &self,
        conn: &mut SqliteConnection,
        follower_id: Uuid,
        followee_id: Uuid,
    ) -> Result<bool> {
        if follower_id == followee_id {
            return Err(Error::ValidationRejected("cannot unfollow yourself"));
        }
        ensure_user(&mut *conn, follower_id).await?;
        ensure_user(&mut *conn, followee_id).await?;

        let result = sqlx::query(
            "DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_following(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        ensure_user(self.db.pool(), follower_id).await?;
        ensure_user(self.db.pool(), followee_id).await?;

        Ok(self.edge(follower_id, followee_id).await?.is_some())
    }

    /// Raw lookup of one directed edge.
    pub async fn edge(&self, follower_id: Uuid, followee_id: Uuid) -> Result<Option<Follow>> {
        let row = sqlx::query(
            "SELECT follower_id, followee_id, created_at \
             FROM follows \
             WHERE follower_id = ?1 AND followee_id = ?2",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| Follow {
            follower_id: row.get("follower_id"),
            followee_id: row.get("followee_id"),
            created_at: timestamp_from_db(row.get("created_at")),
        }))
    }

    pub async fn followers_count(&self, user_id: Uuid) -> Result<i64> {
        ensure_user(self.db.pool(), user_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followee_id = ?1")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    pub async fn following_count(&self, user_id: Uuid) -> Result<i64> {
        ensure_user(self.db.pool(), user_id).await?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = ?1")
            .bind(user_id)
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    pub async fn list_followers(&self, user_id: Uuid, limit: i64) -> Result<Vec<SocialUserEdge>> {
        ensure_user(self.db.pool(), user_id).await?;

        let rows = sqlx::query(
            "SELECT u.id, u.username, u.email, u.password_hash, u.about_me, \
                    u.last_seen, u.created_at, f.created_at AS followed_at \
             FROM follows f \
             JOIN users u ON u.id = f.follower_id \
             WHERE f.followee_id = ?1 \
             ORDER BY f.created_at DESC, f.follower_id DESC \
             LIMIT ?2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(edge_from_row).collect())
    }

    pub async fn list_following(&self, user_id: Uuid, limit: i64) -> Result<Vec<SocialUserEdge>> {
        ensure_user(self.db.pool(), user_id).await?;

        let rows = sqlx::query(
            "SELECT u.id, u.username, u.email, u.password_hash, u.about_me, \
                    u.last_seen, u.created_at, f.created_at AS followed_at \
             FROM follows f \
             JOIN users u ON u.id = f.followee_id \
             WHERE f.follower_id = ?1 \
             ORDER BY f.created_at DESC, f.followee_id DESC \
             LIMIT ?2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.iter().map(edge_from_row).collect())
    }
}

fn edge_from_row(row: &sqlx::sqlite::SqliteRow) -> SocialUserEdge {
    SocialUserEdge {
        user: User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            about_me: row.get("about_me"),
            last_seen: timestamp_from_db(row.get("last_seen")),
            created_at: timestamp_from_db(row.get("created_at")),
        },
        followed_at: timestamp_from_db(row.get("followed_at")),
    }
}

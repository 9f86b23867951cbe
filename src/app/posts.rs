use sqlx::Row;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::ensure_user;
use crate::domain::post::{Post, MAX_POST_LEN};
use crate::error::{Error, Result};
use crate::infra::db::{timestamp_as_db, timestamp_from_db, Db};

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_post(&self, author_id: Uuid, body: &str) -> Result<Post> {
        if body.is_empty() {
            return Err(Error::ValidationRejected("post body is empty"));
        }
        if body.chars().count() > MAX_POST_LEN {
            return Err(Error::ValidationRejected("post body exceeds 140 characters"));
        }
        ensure_user(self.db.pool(), author_id).await?;

        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            body: body.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };

        sqlx::query("INSERT INTO posts (id, author_id, body, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(post.id)
            .bind(post.author_id)
            .bind(&post.body)
            .bind(timestamp_as_db(post.created_at))
            .execute(self.db.pool())
            .await?;

        Ok(post)
    }

    /// Profile timeline: the author's own posts, newest first. Same tie-break
    /// as the home feed so adjacent pages never reorder.
    pub async fn posts_by_author(&self, author_id: Uuid, limit: i64) -> Result<Vec<Post>> {
        ensure_user(self.db.pool(), author_id).await?;

        let rows = sqlx::query(
            "SELECT id, author_id, body, created_at \
             FROM posts \
             WHERE author_id = ?1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT ?2",
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(self.db.pool())
        .await?;

        let posts = rows
            .iter()
            .map(|row| Post {
                id: row.get("id"),
                author_id: row.get("author_id"),
                body: row.get("body"),
                created_at: timestamp_from_db(row.get("created_at")),
            })
            .collect();

        Ok(posts)
    }
}

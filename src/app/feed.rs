use sqlx::Row;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::app::ensure_user;
use crate::domain::post::Post;
use crate::error::Result;
use crate::infra::db::{timestamp_as_db, timestamp_from_db, Db};

#[derive(Clone)]
pub struct FeedService {
    db: Db,
}

impl FeedService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// The viewer's home feed: posts authored by the viewer or by anyone the
    /// viewer follows, newest first.
    ///
    /// The candidate author set is a membership test (`author_id IN
    /// followees-of-viewer`), never a join against the follows table, so a
    /// post appears exactly once no matter how many edges reach its author.
    /// Ties on `created_at` break on `id DESC`, which keeps the order stable
    /// across repeated calls and across keyset pages. Each call re-runs the
    /// full query; nothing is cached.
    pub async fn home_feed(
        &self,
        viewer_id: Uuid,
        cursor: Option<(OffsetDateTime, Uuid)>,
        limit: i64,
    ) -> Result<(Vec<Post>, Option<(OffsetDateTime, Uuid)>)> {
        ensure_user(self.db.pool(), viewer_id).await?;

        let limit_plus = limit + 1;
        let rows = match cursor {
            Some((created_at, post_id)) => {
                sqlx::query(
                    "SELECT id, author_id, body, created_at \
                     FROM posts \
                     WHERE (author_id = ?1 \
                        OR author_id IN ( \
                            SELECT followee_id FROM follows WHERE follower_id = ?1 \
                        )) \
                       AND (created_at < ?2 OR (created_at = ?2 AND id < ?3)) \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT ?4",
                )
                .bind(viewer_id)
                .bind(timestamp_as_db(created_at))
                .bind(post_id)
                .bind(limit_plus)
                .fetch_all(self.db.pool())
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, author_id, body, created_at \
                     FROM posts \
                     WHERE author_id = ?1 \
                        OR author_id IN ( \
                            SELECT followee_id FROM follows WHERE follower_id = ?1 \
                        ) \
                     ORDER BY created_at DESC, id DESC \
                     LIMIT ?2",
                )
                .bind(viewer_id)
                .bind(limit_plus)
                .fetch_all(self.db.pool())
                .await?
            }
        };

        let mut posts: Vec<Post> = rows
            .iter()
            .map(|row| Post {
                id: row.get("id"),
                author_id: row.get("author_id"),
                body: row.get("body"),
                created_at: timestamp_from_db(row.get("created_at")),
            })
            .collect();

        let next_cursor = if posts.len() > limit as usize {
            posts.pop().map(|extra| (extra.created_at, extra.id))
        } else {
            None
        };

        Ok((posts, next_cursor))
    }
}

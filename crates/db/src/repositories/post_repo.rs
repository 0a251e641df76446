//! Repository for the `posts` table.
//!
//! Posts are passive records here: channel pages only need the published
//! count.

use sqlx::PgPool;

use cliply_core::types::DbId;

pub struct PostRepo;

impl PostRepo {
    /// Count published posts owned by a user.
    pub async fn count_for_owner(pool: &PgPool, owner_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM posts WHERE owner_id = $1 AND is_published = true",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}

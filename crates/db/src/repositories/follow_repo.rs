//! Repository for the `follows` table.
//!
//! Follow edges are passive records: this API only counts them and checks
//! membership for channel profiles, it never creates them.

use sqlx::PgPool;

use cliply_core::types::DbId;

/// Count and membership reads over follow edges.
pub struct FollowRepo;

impl FollowRepo {
    /// Number of accounts following `user_id`.
    pub async fn follower_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM follows WHERE followee_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Number of accounts `user_id` follows.
    pub async fn following_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Whether `follower_id` currently follows `followee_id`.
    pub async fn is_following(
        pool: &PgPool,
        follower_id: DbId,
        followee_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2
             )",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }
}

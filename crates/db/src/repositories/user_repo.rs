//! Repository for the `users` table.

use sqlx::PgPool;

use cliply_core::types::DbId;

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, full_name, password_hash, avatar_url, \
                        cover_image_url, refresh_token, created_at, updated_at";

/// Provides CRUD operations for users, including the narrow session-field
/// updates used for refresh-token rotation.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, full_name, password_hash, avatar_url, cover_image_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.full_name)
            .bind(&input.password_hash)
            .bind(&input.avatar_url)
            .bind(&input.cover_image_url)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (expects the normalized lowercase form).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user matching either identifier in a single query.
    ///
    /// `None` identifiers bind SQL NULL, which never matches, so callers
    /// can pass whichever identifier the client supplied.
    pub async fn find_by_username_or_email(
        pool: &PgPool,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1 OR email = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Persist a new refresh token, overwriting any previous value.
    ///
    /// Narrow single-column update: touches only the session field, so no
    /// other column is re-validated or modified. This is the rotation
    /// point -- the previous token becomes invalid as soon as this write
    /// lands. Returns `true` if the row was updated.
    pub async fn set_refresh_token(
        pool: &PgPool,
        id: DbId,
        refresh_token: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET refresh_token = $2 WHERE id = $1")
            .bind(id)
            .bind(refresh_token)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the stored refresh token (logout). Idempotent: clearing an
    /// already-cleared token is not an error.
    pub async fn clear_refresh_token(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET refresh_token = NULL WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Patch account details. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_account(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE($2, full_name),
                email = COALESCE($3, email)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .fetch_optional(pool)
            .await
    }

    /// Replace the avatar URL. Returns the updated row, or `None` if the
    /// user does not exist.
    pub async fn update_avatar(
        pool: &PgPool,
        id: DbId,
        avatar_url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET avatar_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(avatar_url)
            .fetch_optional(pool)
            .await
    }

    /// Replace the cover image URL. Returns the updated row, or `None` if
    /// the user does not exist.
    pub async fn update_cover_image(
        pool: &PgPool,
        id: DbId,
        cover_image_url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("UPDATE users SET cover_image_url = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(cover_image_url)
            .fetch_optional(pool)
            .await
    }
}

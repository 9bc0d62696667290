use crate::domain::user::User;
use crate::error::Result;
use crate::storage::records::user::UserRecord;
use sqlx::PgConnection;

#[derive(Clone, Debug, Default)]
pub struct UserRepository;

impl UserRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    pub async fn create(
        &self,
        conn: &mut PgConnection,
        username: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, display_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, display_name, password_hash, image, created_at
            "#,
        )
        .bind(username)
        .bind(display_name)
        .bind(password_hash)
        .fetch_one(conn)
        .await?;

        Ok(record.into())
    }

    pub async fn find_by_username(
        &self,
        conn: &mut PgConnection,
        username: &str,
    ) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, display_name, password_hash, image, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(User::from))
    }

    pub async fn find_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, display_name, password_hash, image, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(User::from))
    }

    pub async fn exists_by_username(&self, conn: &mut PgConnection, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(conn)
            .await?;

        Ok(exists)
    }

    /// Fetches one page of users, newest first, optionally leaving out a
    /// single user (the authenticated requester).
    pub async fn list(
        &self,
        conn: &mut PgConnection,
        exclude_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let records = match exclude_id {
            Some(id) => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT id, username, display_name, password_hash, image, created_at
                    FROM users
                    WHERE id <> $1
                    ORDER BY id DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(id)
                .bind(limit)
                .bind(offset)
                .fetch_all(conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, UserRecord>(
                    r#"
                    SELECT id, username, display_name, password_hash, image, created_at
                    FROM users
                    ORDER BY id DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(conn)
                .await?
            }
        };

        Ok(records.into_iter().map(User::from).collect())
    }

    pub async fn count(&self, conn: &mut PgConnection, exclude_id: Option<i64>) -> Result<i64> {
        let total: i64 = match exclude_id {
            Some(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id <> $1")
                    .bind(id)
                    .fetch_one(conn)
                    .await?
            }
            None => sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(conn).await?,
        };

        Ok(total)
    }

    /// Overwrites the display name and, when a new image name is given,
    /// the image column.
    pub async fn update_profile(
        &self,
        conn: &mut PgConnection,
        id: i64,
        display_name: &str,
        image: Option<&str>,
    ) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users
            SET display_name = $2, image = COALESCE($3, image)
            WHERE id = $1
            RETURNING id, username, display_name, password_hash, image, created_at
            "#,
        )
        .bind(id)
        .bind(display_name)
        .bind(image)
        .fetch_optional(conn)
        .await?;

        Ok(record.map(User::from))
    }
}

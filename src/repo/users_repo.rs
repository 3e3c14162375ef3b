use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct UsersRepo {
    pub pool: PgPool,
}

impl UsersRepo {
    /// Returns the id of `username`, creating the user with `email` if needed.
    pub async fn get_or_create(&self, username: &str, email: &str) -> anyhow::Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("id")?)
    }
}

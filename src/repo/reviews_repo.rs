use crate::domain::review::{Review, ReviewInput};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

#[derive(Clone)]
pub struct ReviewsRepo {
    pub pool: PgPool,
}

fn map_review(r: PgRow) -> anyhow::Result<Review> {
    Ok(Review {
        id: r.try_get("id")?,
        listing_id: r.try_get("listing_id")?,
        reviewer_id: r.try_get("reviewer_id")?,
        rating: r.try_get("rating")?,
        comment: r.try_get("comment")?,
        created_at: r.try_get("created_at")?,
    })
}

impl ReviewsRepo {
    pub async fn list_for_listing(&self, listing_id: i64) -> anyhow::Result<Vec<Review>> {
        let rows = sqlx::query(
            "SELECT id, listing_id, reviewer_id, rating, comment, created_at FROM reviews WHERE listing_id = $1 ORDER BY created_at DESC",
        )
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_review).collect()
    }

    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Review>> {
        let row = sqlx::query(
            "SELECT id, listing_id, reviewer_id, rating, comment, created_at FROM reviews WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_review).transpose()
    }

    pub async fn create(&self, listing_id: i64, input: &ReviewInput) -> anyhow::Result<Review> {
        let row = sqlx::query(
            r#"
            INSERT INTO reviews (listing_id, reviewer_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, listing_id, reviewer_id, rating, comment, created_at
            "#,
        )
        .bind(listing_id)
        .bind(input.reviewer_id)
        .bind(input.rating)
        .bind(&input.comment)
        .fetch_one(&self.pool)
        .await?;

        map_review(row)
    }

    pub async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }
}

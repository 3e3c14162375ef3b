use crate::domain::listing::{Listing, ListingInput};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const LISTING_COLUMNS: &str =
    "id, title, description, price_per_night, max_guests, host_id, created_at";

#[derive(Clone)]
pub struct ListingsRepo {
    pub pool: PgPool,
}

fn map_listing(r: PgRow) -> anyhow::Result<Listing> {
    Ok(Listing {
        id: r.try_get("id")?,
        title: r.try_get("title")?,
        description: r.try_get("description")?,
        price_per_night: r.try_get("price_per_night")?,
        max_guests: r.try_get("max_guests")?,
        host_id: r.try_get("host_id")?,
        created_at: r.try_get("created_at")?,
    })
}

impl ListingsRepo {
    pub async fn list_all(&self) -> anyhow::Result<Vec<Listing>> {
        let rows = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_listing).collect()
    }

    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Listing>> {
        let row = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_listing).transpose()
    }

    pub async fn find_by_title(&self, title: &str) -> anyhow::Result<Option<Listing>> {
        let row = sqlx::query(&format!(
            "SELECT {LISTING_COLUMNS} FROM listings WHERE title = $1 ORDER BY id ASC LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_listing).transpose()
    }

    pub async fn create(&self, input: &ListingInput) -> anyhow::Result<Listing> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO listings (title, description, price_per_night, max_guests, host_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.price_per_night)
        .bind(input.max_guests)
        .bind(input.host_id)
        .fetch_one(&self.pool)
        .await?;

        map_listing(row)
    }

    pub async fn update(&self, id: i64, input: &ListingInput) -> anyhow::Result<Option<Listing>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE listings
            SET title = $2, description = $3, price_per_night = $4, max_guests = $5, host_id = $6
            WHERE id = $1
            RETURNING {LISTING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.title.trim())
        .bind(&input.description)
        .bind(input.price_per_night)
        .bind(input.max_guests)
        .bind(input.host_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_listing).transpose()
    }

    pub async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }

    pub async fn delete_all(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM listings").execute(&self.pool).await?;
        Ok(res.rows_affected())
    }
}

use crate::domain::booking::{Booking, BookingInput};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const BOOKING_COLUMNS: &str = "id, listing_id, guest_id, start_date, end_date, guests, created_at";

#[derive(Clone)]
pub struct BookingsRepo {
    pub pool: PgPool,
}

fn map_booking(r: PgRow) -> anyhow::Result<Booking> {
    Ok(Booking {
        id: r.try_get("id")?,
        listing_id: r.try_get("listing_id")?,
        guest_id: r.try_get("guest_id")?,
        start_date: r.try_get("start_date")?,
        end_date: r.try_get("end_date")?,
        guests: r.try_get("guests")?,
        created_at: r.try_get("created_at")?,
    })
}

impl BookingsRepo {
    pub async fn list_all(&self) -> anyhow::Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_booking).collect()
    }

    pub async fn get(&self, id: i64) -> anyhow::Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_booking).transpose()
    }

    pub async fn create(&self, input: &BookingInput) -> anyhow::Result<Booking> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (listing_id, guest_id, start_date, end_date, guests)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(input.listing_id)
        .bind(input.guest_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.guests)
        .fetch_one(&self.pool)
        .await?;

        map_booking(row)
    }

    pub async fn update(&self, id: i64, input: &BookingInput) -> anyhow::Result<Option<Booking>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET listing_id = $2, guest_id = $3, start_date = $4, end_date = $5, guests = $6
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(input.listing_id)
        .bind(input.guest_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.guests)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_booking).transpose()
    }

    pub async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }
}

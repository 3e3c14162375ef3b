use crate::domain::payment::{NewPayment, PayableBooking, Payment, PaymentStatus};
use crate::repo::ledger::PaymentLedger;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const PAYMENT_COLUMNS: &str =
    "id, booking_id, transaction_id, amount, status, reference, created_at, updated_at";

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

fn map_payment(r: &PgRow) -> Result<Payment> {
    let status: String = r.try_get("status")?;
    Ok(Payment {
        id: r.try_get("id")?,
        booking_id: r.try_get("booking_id")?,
        transaction_id: r.try_get("transaction_id")?,
        amount: r.try_get("amount")?,
        status: status.parse()?,
        reference: r.try_get("reference")?,
        created_at: r.try_get("created_at")?,
        updated_at: r.try_get("updated_at")?,
    })
}

#[async_trait::async_trait]
impl PaymentLedger for PaymentsRepo {
    async fn payable_booking(&self, booking_id: i64) -> Result<Option<PayableBooking>> {
        let row = sqlx::query(
            r#"
            SELECT b.id, l.price_per_night, u.email, u.first_name, u.last_name
            FROM bookings b
            JOIN listings l ON l.id = b.listing_id
            JOIN users u ON u.id = b.guest_id
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> Result<PayableBooking> {
            Ok(PayableBooking {
                booking_id: r.try_get("id")?,
                amount: r.try_get("price_per_night")?,
                payer_email: r.try_get("email")?,
                payer_first_name: r.try_get("first_name")?,
                payer_last_name: r.try_get("last_name")?,
            })
        })
        .transpose()
    }

    async fn payment_for_booking(&self, booking_id: i64) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_payment).transpose()
    }

    async fn insert_pending(&self, payment: &NewPayment) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO payments (booking_id, transaction_id, amount, status, reference)
            VALUES ($1, $2, $3, 'Pending', $4)
            ON CONFLICT (booking_id) DO NOTHING
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(payment.booking_id)
        .bind(payment.transaction_id.clone())
        .bind(payment.amount)
        .bind(payment.reference.clone())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_payment).transpose()
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE reference = $1"
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_payment).transpose()
    }

    async fn settle(
        &self,
        reference: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<Payment>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE payments
            SET status = $2, transaction_id = COALESCE($3, transaction_id), updated_at = now()
            WHERE reference = $1 AND status = 'Pending'
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(reference)
        .bind(status.as_str())
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_payment).transpose()
    }
}

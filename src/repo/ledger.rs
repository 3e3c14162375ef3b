use crate::domain::payment::{NewPayment, PayableBooking, Payment, PaymentStatus};
use anyhow::Result;

/// Storage seam for the payment flow.
#[async_trait::async_trait]
pub trait PaymentLedger: Send + Sync {
    async fn payable_booking(&self, booking_id: i64) -> Result<Option<PayableBooking>>;

    async fn payment_for_booking(&self, booking_id: i64) -> Result<Option<Payment>>;

    /// Returns `None` when the booking already owns a payment.
    async fn insert_pending(&self, payment: &NewPayment) -> Result<Option<Payment>>;

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>>;

    /// Moves a `Pending` payment to `status`. Returns `None` if the payment is
    /// missing or already terminal.
    async fn settle(
        &self,
        reference: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<Payment>>;
}

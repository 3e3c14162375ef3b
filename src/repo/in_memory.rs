use crate::domain::payment::{NewPayment, PayableBooking, Payment, PaymentStatus};
use crate::repo::ledger::PaymentLedger;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ledger backed by process memory. Enforces the same one-payment-per-booking
/// and unique-reference rules as the `payments` table.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    bookings: Arc<RwLock<HashMap<i64, PayableBooking>>>,
    payments: Arc<RwLock<Vec<Payment>>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_booking(&self, booking: PayableBooking) {
        self.bookings
            .write()
            .await
            .insert(booking.booking_id, booking);
    }

    /// Removing a booking drops its payment, like the cascading foreign key.
    pub async fn remove_booking(&self, booking_id: i64) {
        self.bookings.write().await.remove(&booking_id);
        self.payments
            .write()
            .await
            .retain(|p| p.booking_id != booking_id);
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.payments.read().await.clone()
    }
}

#[async_trait::async_trait]
impl PaymentLedger for InMemoryLedger {
    async fn payable_booking(&self, booking_id: i64) -> Result<Option<PayableBooking>> {
        Ok(self.bookings.read().await.get(&booking_id).cloned())
    }

    async fn payment_for_booking(&self, booking_id: i64) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.iter().find(|p| p.booking_id == booking_id).cloned())
    }

    async fn insert_pending(&self, payment: &NewPayment) -> Result<Option<Payment>> {
        let mut payments = self.payments.write().await;
        if payments.iter().any(|p| p.booking_id == payment.booking_id) {
            return Ok(None);
        }
        if payments.iter().any(|p| p.reference == payment.reference) {
            anyhow::bail!("duplicate payment reference {}", payment.reference);
        }

        let now = chrono::Utc::now();
        let stored = Payment {
            id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
            booking_id: payment.booking_id,
            transaction_id: payment.transaction_id.clone(),
            amount: payment.amount,
            status: PaymentStatus::Pending,
            reference: payment.reference.clone(),
            created_at: now,
            updated_at: now,
        };
        payments.push(stored.clone());
        Ok(Some(stored))
    }

    async fn find_by_reference(&self, reference: &str) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.iter().find(|p| p.reference == reference).cloned())
    }

    async fn settle(
        &self,
        reference: &str,
        status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Option<Payment>> {
        let mut payments = self.payments.write().await;
        let Some(p) = payments
            .iter_mut()
            .find(|p| p.reference == reference && p.status == PaymentStatus::Pending)
        else {
            return Ok(None);
        };

        p.status = status;
        if let Some(id) = transaction_id {
            p.transaction_id = Some(id.to_string());
        }
        p.updated_at = chrono::Utc::now();
        Ok(Some(p.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn booking(id: i64) -> PayableBooking {
        PayableBooking {
            booking_id: id,
            amount: dec!(59.00),
            payer_email: "guest@example.com".to_string(),
            payer_first_name: "Ada".to_string(),
            payer_last_name: "Guest".to_string(),
        }
    }

    fn new_payment(booking_id: i64, reference: &str) -> NewPayment {
        NewPayment {
            booking_id,
            amount: dec!(59.00),
            reference: reference.to_string(),
            transaction_id: None,
        }
    }

    #[tokio::test]
    async fn second_insert_for_booking_is_rejected() {
        let ledger = InMemoryLedger::new();
        ledger.add_booking(booking(1)).await;

        assert!(ledger.insert_pending(&new_payment(1, "a")).await.unwrap().is_some());
        assert!(ledger.insert_pending(&new_payment(1, "b")).await.unwrap().is_none());
        assert_eq!(ledger.payments().await.len(), 1);
    }

    #[tokio::test]
    async fn settle_only_moves_pending() {
        let ledger = InMemoryLedger::new();
        ledger.insert_pending(&new_payment(1, "a")).await.unwrap();

        let done = ledger
            .settle("a", PaymentStatus::Failed, Some("chapa-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.status, PaymentStatus::Failed);
        assert_eq!(done.transaction_id.as_deref(), Some("chapa-1"));

        let again = ledger.settle("a", PaymentStatus::Completed, None).await.unwrap();
        assert!(again.is_none());
        let stored = ledger.find_by_reference("a").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentStatus::Failed);
    }

    #[tokio::test]
    async fn removing_booking_cascades() {
        let ledger = InMemoryLedger::new();
        ledger.add_booking(booking(3)).await;
        ledger.insert_pending(&new_payment(3, "c")).await.unwrap();

        ledger.remove_booking(3).await;
        assert!(ledger.payment_for_booking(3).await.unwrap().is_none());
        assert!(ledger.payable_booking(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ids_stay_unique_after_cascade() {
        let ledger = InMemoryLedger::new();
        ledger.insert_pending(&new_payment(1, "a")).await.unwrap();
        ledger.insert_pending(&new_payment(2, "b")).await.unwrap();
        ledger.remove_booking(1).await;
        let third = ledger.insert_pending(&new_payment(3, "c")).await.unwrap().unwrap();

        let ids: Vec<i64> = ledger.payments().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(third.id, 3);
    }
}

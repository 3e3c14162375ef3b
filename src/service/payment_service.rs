use crate::domain::payment::{
    InitiatePaymentResponse, NewPayment, Payment, PaymentStatus, VerifyPaymentResponse,
};
use crate::error::ApiError;
use crate::gateways::{InitializeRequest, PaymentGateway};
use crate::repo::ledger::PaymentLedger;
use crate::service::retry::{with_retry, RetryPolicy};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub currency: String,
    pub callback_url: String,
    pub return_url: String,
}

#[derive(Clone)]
pub struct PaymentService {
    pub ledger: Arc<dyn PaymentLedger>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub checkout: CheckoutSettings,
    pub retry: RetryPolicy,
}

impl PaymentService {
    pub async fn initiate(&self, booking_id: Option<i64>) -> Result<InitiatePaymentResponse, ApiError> {
        let booking_id =
            booking_id.ok_or_else(|| ApiError::Validation("booking_id is required".to_string()))?;

        let booking = self
            .ledger
            .payable_booking(booking_id)
            .await?
            .ok_or(ApiError::NotFound("booking"))?;

        if self.ledger.payment_for_booking(booking_id).await?.is_some() {
            return Err(ApiError::Conflict(
                "payment already exists for this booking".to_string(),
            ));
        }

        let tx_ref = Uuid::new_v4().to_string();
        let request = InitializeRequest {
            amount: booking.amount,
            currency: self.checkout.currency.clone(),
            email: booking.payer_email.clone(),
            first_name: booking.payer_first_name.clone(),
            last_name: booking.payer_last_name.clone(),
            tx_ref: tx_ref.clone(),
            callback_url: with_tx_ref(&self.checkout.callback_url, &tx_ref),
            return_url: self.checkout.return_url.clone(),
        };

        let session = with_retry(&self.retry, "initialize", || self.gateway.initialize(&request))
            .await
            .map_err(|e| {
                tracing::warn!(booking_id, tx_ref = %tx_ref, gateway = self.gateway.name(), error = %e, "payment initiation failed");
                ApiError::InitiationFailed {
                    details: e.details(),
                }
            })?;

        let inserted = self
            .ledger
            .insert_pending(&NewPayment {
                booking_id,
                amount: booking.amount,
                reference: tx_ref.clone(),
                transaction_id: session.transaction_id.clone(),
            })
            .await?;

        // Lost a race with a concurrent initiation for the same booking.
        if inserted.is_none() {
            tracing::warn!(booking_id, tx_ref = %tx_ref, "concurrent initiation, discarding checkout");
            return Err(ApiError::Conflict(
                "payment already exists for this booking".to_string(),
            ));
        }

        tracing::info!(booking_id, tx_ref = %tx_ref, amount = %booking.amount, "payment initiated");
        Ok(InitiatePaymentResponse {
            message: "Payment initiated".to_string(),
            checkout_url: session.checkout_url,
            tx_ref,
        })
    }

    pub async fn verify(&self, tx_ref: Option<&str>) -> Result<VerifyPaymentResponse, ApiError> {
        let tx_ref = tx_ref
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ApiError::Validation("tx_ref is required".to_string()))?;

        let payment = self
            .ledger
            .find_by_reference(tx_ref)
            .await?
            .ok_or(ApiError::NotFound("payment"))?;

        if payment.status.is_terminal() {
            return Ok(verified(&payment));
        }

        let outcome = with_retry(&self.retry, "verify", || self.gateway.verify(tx_ref)).await;
        let (status, transaction_id) = match &outcome {
            Ok(v) if v.is_success() => (PaymentStatus::Completed, v.transaction_id.as_deref()),
            Ok(v) => {
                tracing::info!(tx_ref, gateway_status = %v.status, response = %v.raw, "gateway reported unsuccessful transaction");
                (PaymentStatus::Failed, v.transaction_id.as_deref())
            }
            Err(e) => {
                tracing::warn!(tx_ref, error = %e, details = %e.details(), "verification call failed");
                (PaymentStatus::Failed, None)
            }
        };

        let settled = match self.ledger.settle(tx_ref, status, transaction_id).await? {
            Some(p) => p,
            // Settled concurrently; report whatever won.
            None => self
                .ledger
                .find_by_reference(tx_ref)
                .await?
                .ok_or(ApiError::NotFound("payment"))?,
        };

        tracing::info!(tx_ref, booking_id = settled.booking_id, status = settled.status.as_str(), "payment verified");
        Ok(verified(&settled))
    }

    pub async fn payment_for_booking(&self, booking_id: i64) -> Result<Option<Payment>, ApiError> {
        Ok(self.ledger.payment_for_booking(booking_id).await?)
    }
}

fn verified(payment: &Payment) -> VerifyPaymentResponse {
    let message = match payment.status {
        PaymentStatus::Completed => "Payment completed",
        PaymentStatus::Failed => "Payment failed",
        PaymentStatus::Pending => "Payment pending",
    };
    VerifyPaymentResponse {
        message: message.to_string(),
        status: payment.status,
    }
}

fn with_tx_ref(url: &str, tx_ref: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}tx_ref={tx_ref}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_carries_reference() {
        assert_eq!(
            with_tx_ref("http://h/payments/verify/", "r1"),
            "http://h/payments/verify/?tx_ref=r1"
        );
        assert_eq!(with_tx_ref("http://h/cb?x=1", "r1"), "http://h/cb?x=1&tx_ref=r1");
    }
}

use rust_decimal::Decimal;
use std::sync::Arc;
use travel_booking::domain::payment::PayableBooking;
use travel_booking::gateways::mock::MockGateway;
use travel_booking::repo::in_memory::InMemoryLedger;
use travel_booking::service::payment_service::{CheckoutSettings, PaymentService};
use travel_booking::service::retry::RetryPolicy;

pub fn booking(id: i64, amount: Decimal) -> PayableBooking {
    PayableBooking {
        booking_id: id,
        amount,
        payer_email: "guest@example.com".to_string(),
        payer_first_name: "Ada".to_string(),
        payer_last_name: "Guest".to_string(),
    }
}

pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay_ms: 0,
        max_delay_ms: 0,
    }
}

pub fn service(ledger: &InMemoryLedger, gateway: Arc<MockGateway>, retry: RetryPolicy) -> PaymentService {
    PaymentService {
        ledger: Arc::new(ledger.clone()),
        gateway,
        checkout: CheckoutSettings {
            currency: "ETB".to_string(),
            callback_url: "http://localhost:3000/payments/verify/".to_string(),
            return_url: "http://localhost:3000/payments/complete/".to_string(),
        },
        retry,
    }
}

mod common;

use common::{booking, fast_retry, service};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tokio::sync::Barrier;
use travel_booking::domain::payment::PaymentStatus;
use travel_booking::error::ApiError;
use travel_booking::gateways::mock::MockGateway;
use travel_booking::repo::in_memory::InMemoryLedger;

#[tokio::test]
async fn initiate_then_verify_completes_payment() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(7, dec!(120.00))).await;
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS").with_checkout_url("https://pay/x"));
    let svc = service(&ledger, gateway.clone(), fast_retry(1));

    let init = svc.initiate(Some(7)).await.unwrap();
    assert_eq!(init.checkout_url, "https://pay/x");
    assert!(uuid::Uuid::parse_str(&init.tx_ref).is_ok());

    let stored = ledger.payments().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, PaymentStatus::Pending);
    assert_eq!(stored[0].amount, dec!(120.00));
    assert_eq!(stored[0].reference, init.tx_ref);
    assert!(stored[0].transaction_id.is_some());

    let verified = svc.verify(Some(&init.tx_ref)).await.unwrap();
    assert_eq!(verified.status, PaymentStatus::Completed);

    let after = &ledger.payments().await[0];
    assert_eq!(after.reference, init.tx_ref);
    assert_eq!(after.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn second_initiation_conflicts_without_new_row() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(1, dec!(59.00))).await;
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS"));
    let svc = service(&ledger, gateway.clone(), fast_retry(1));

    svc.initiate(Some(1)).await.unwrap();
    let err = svc.initiate(Some(1)).await.unwrap_err();

    assert!(matches!(err, ApiError::Conflict(_)));
    assert_eq!(ledger.payments().await.len(), 1);
    assert_eq!(gateway.initialize_calls(), 1);
}

#[tokio::test]
async fn references_are_unique_across_bookings() {
    let ledger = InMemoryLedger::new();
    for id in 1..=5 {
        ledger.add_booking(booking(id, dec!(10.00))).await;
    }
    let svc = service(&ledger, Arc::new(MockGateway::new("ALWAYS_SUCCESS")), fast_retry(1));

    let mut refs = Vec::new();
    for id in 1..=5 {
        refs.push(svc.initiate(Some(id)).await.unwrap().tx_ref);
    }
    refs.sort();
    refs.dedup();
    assert_eq!(refs.len(), 5);
}

#[tokio::test]
async fn unknown_booking_is_not_found() {
    let ledger = InMemoryLedger::new();
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS"));
    let svc = service(&ledger, gateway.clone(), fast_retry(1));

    let err = svc.initiate(Some(404)).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("booking")));
    assert_eq!(gateway.initialize_calls(), 0);
}

#[tokio::test]
async fn missing_booking_id_is_validation_error() {
    let ledger = InMemoryLedger::new();
    let svc = service(&ledger, Arc::new(MockGateway::new("ALWAYS_SUCCESS")), fast_retry(1));

    let err = svc.initiate(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));
}

#[tokio::test]
async fn gateway_decline_writes_nothing() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(2, dec!(200.00))).await;
    let svc = service(&ledger, Arc::new(MockGateway::new("ALWAYS_FAILURE")), fast_retry(3));

    let err = svc.initiate(Some(2)).await.unwrap_err();
    match err {
        ApiError::InitiationFailed { details } => {
            assert_eq!(details["gateway_status"], 400);
            assert_eq!(details["gateway_response"]["message"], "mock decline");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(ledger.payments().await.is_empty());
}

#[tokio::test]
async fn unsuccessful_gateway_status_fails_payment() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(3, dec!(59.00))).await;
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS").with_verify_status("failed"));
    let svc = service(&ledger, gateway, fast_retry(1));

    let init = svc.initiate(Some(3)).await.unwrap();
    let verified = svc.verify(Some(&init.tx_ref)).await.unwrap();
    assert_eq!(verified.status, PaymentStatus::Failed);
}

#[tokio::test]
async fn failed_payment_is_not_reverified() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(4, dec!(59.00))).await;
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS").with_verify_status("failed"));
    let svc = service(&ledger, gateway.clone(), fast_retry(1));

    let init = svc.initiate(Some(4)).await.unwrap();
    svc.verify(Some(&init.tx_ref)).await.unwrap();
    let again = svc.verify(Some(&init.tx_ref)).await.unwrap();

    assert_eq!(again.status, PaymentStatus::Failed);
    assert_eq!(gateway.verify_calls(), 1);
}

#[tokio::test]
async fn unknown_reference_is_not_found_and_writes_nothing() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(5, dec!(59.00))).await;
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS"));
    let svc = service(&ledger, gateway.clone(), fast_retry(1));
    svc.initiate(Some(5)).await.unwrap();

    let err = svc.verify(Some("no-such-ref")).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound("payment")));
    assert_eq!(gateway.verify_calls(), 0);
    assert_eq!(ledger.payments().await[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn blank_reference_is_validation_error() {
    let ledger = InMemoryLedger::new();
    let svc = service(&ledger, Arc::new(MockGateway::new("ALWAYS_SUCCESS")), fast_retry(1));

    assert!(matches!(svc.verify(None).await, Err(ApiError::Validation(_))));
    assert!(matches!(svc.verify(Some("  ")).await, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn concurrent_initiations_create_one_payment() {
    let ledger = InMemoryLedger::new();
    ledger.add_booking(booking(9, dec!(59.00))).await;
    // Both calls pass the existence check and reach the gateway before either inserts.
    let gate = Arc::new(Barrier::new(2));
    let gateway = Arc::new(MockGateway::new("ALWAYS_SUCCESS").with_initialize_gate(gate));
    let svc = service(&ledger, gateway.clone(), fast_retry(1));

    let (a, b) = tokio::join!(svc.initiate(Some(9)), svc.initiate(Some(9)));

    assert_eq!(gateway.initialize_calls(), 2);
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(loser, ApiError::Conflict(_)));

    let stored = ledger.payments().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, PaymentStatus::Pending);
}

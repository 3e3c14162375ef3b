use crate::gateways::{CheckoutSession, GatewayError, InitializeRequest, PaymentGateway, VerifiedTransaction};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

/// In-process gateway driven by a behavior string:
/// `ALWAYS_SUCCESS` (default), `ALWAYS_FAILURE`, `ALWAYS_TIMEOUT`.
pub struct MockGateway {
    pub behavior: String,
    pub checkout_url: String,
    /// Status reported by `verify` when the behavior is successful.
    pub verify_status: String,
    /// Number of leading calls answered with a 503 before `behavior` applies.
    pub transient_failures: u32,
    /// When set, every `initialize` call waits here before answering, so
    /// concurrent callers are all in flight at once.
    pub initialize_gate: Option<Arc<Barrier>>,
    initialize_calls: AtomicU32,
    verify_calls: AtomicU32,
    seen_refs: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new(behavior: &str) -> Self {
        Self {
            behavior: behavior.to_string(),
            checkout_url: "https://checkout.mock.local/pay".to_string(),
            verify_status: "success".to_string(),
            transient_failures: 0,
            initialize_gate: None,
            initialize_calls: AtomicU32::new(0),
            verify_calls: AtomicU32::new(0),
            seen_refs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_checkout_url(mut self, url: &str) -> Self {
        self.checkout_url = url.to_string();
        self
    }

    pub fn with_verify_status(mut self, status: &str) -> Self {
        self.verify_status = status.to_string();
        self
    }

    pub fn with_transient_failures(mut self, n: u32) -> Self {
        self.transient_failures = n;
        self
    }

    pub fn with_initialize_gate(mut self, gate: Arc<Barrier>) -> Self {
        self.initialize_gate = Some(gate);
        self
    }

    pub fn initialize_calls(&self) -> u32 {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> u32 {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// References received by `initialize`, in call order.
    pub fn seen_refs(&self) -> Vec<String> {
        self.seen_refs
            .lock()
            .map(|refs| refs.clone())
            .unwrap_or_default()
    }

    fn scripted_failure(&self, call_index: u32) -> Option<GatewayError> {
        if call_index < self.transient_failures {
            return Some(GatewayError::Rejected {
                status: 503,
                body: serde_json::json!({"status": "failed", "message": "mock unavailable"}),
            });
        }
        match self.behavior.as_str() {
            "ALWAYS_FAILURE" => Some(GatewayError::Rejected {
                status: 400,
                body: serde_json::json!({"status": "failed", "message": "mock decline"}),
            }),
            "ALWAYS_TIMEOUT" => Some(GatewayError::Timeout),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn initialize(&self, request: &InitializeRequest) -> Result<CheckoutSession, GatewayError> {
        let call = self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut refs) = self.seen_refs.lock() {
            refs.push(request.tx_ref.clone());
        }
        if let Some(gate) = &self.initialize_gate {
            gate.wait().await;
        }
        if let Some(e) = self.scripted_failure(call) {
            return Err(e);
        }

        Ok(CheckoutSession {
            checkout_url: self.checkout_url.clone(),
            transaction_id: Some(format!("mock_txn_{}", uuid::Uuid::new_v4())),
        })
    }

    async fn verify(&self, tx_ref: &str) -> Result<VerifiedTransaction, GatewayError> {
        let call = self.verify_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.scripted_failure(call) {
            return Err(e);
        }

        Ok(VerifiedTransaction {
            status: self.verify_status.clone(),
            transaction_id: None,
            raw: serde_json::json!({
                "status": "success",
                "data": { "status": self.verify_status, "tx_ref": tx_ref }
            }),
        })
    }
}

use rust_decimal::Decimal;
use thiserror::Error;

pub mod chapa;
pub mod mock;

#[derive(Debug, Clone)]
pub struct InitializeRequest {
    pub amount: Decimal,
    pub currency: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub tx_ref: String,
    pub callback_url: String,
    pub return_url: String,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub checkout_url: String,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VerifiedTransaction {
    /// Transaction status as reported by the gateway, e.g. `success` or `failed`.
    pub status: String,
    pub transaction_id: Option<String>,
    pub raw: serde_json::Value,
}

impl VerifiedTransaction {
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("gateway rejected request with HTTP {status}")]
    Rejected { status: u16, body: serde_json::Value },

    #[error("gateway timeout")]
    Timeout,

    #[error("gateway unreachable: {0}")]
    Network(String),
}

impl GatewayError {
    /// Worth retrying with the same reference.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Rejected { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Timeout | GatewayError::Network(_) => true,
        }
    }

    /// Payload handed back to the API caller.
    pub fn details(&self) -> serde_json::Value {
        match self {
            GatewayError::Rejected { status, body } => serde_json::json!({
                "gateway_status": status,
                "gateway_response": body,
            }),
            GatewayError::Timeout => serde_json::json!({"error": "gateway timeout"}),
            GatewayError::Network(msg) => serde_json::json!({"error": msg}),
        }
    }
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn initialize(&self, request: &InitializeRequest) -> Result<CheckoutSession, GatewayError>;

    async fn verify(&self, tx_ref: &str) -> Result<VerifiedTransaction, GatewayError>;
}

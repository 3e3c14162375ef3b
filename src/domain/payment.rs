use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
            PaymentStatus::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Completed" => Ok(PaymentStatus::Completed),
            "Failed" => Ok(PaymentStatus::Failed),
            other => Err(anyhow::anyhow!("unknown payment status {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub transaction_id: Option<String>,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub reference: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the payment flow needs to know about a booking before charging for it.
#[derive(Debug, Clone)]
pub struct PayableBooking {
    pub booking_id: i64,
    pub amount: Decimal,
    pub payer_email: String,
    pub payer_first_name: String,
    pub payer_last_name: String,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub booking_id: i64,
    pub amount: Decimal,
    pub reference: String,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentRequest {
    pub booking_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InitiatePaymentResponse {
    pub message: String,
    pub checkout_url: String,
    pub tx_ref: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentQuery {
    pub tx_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyPaymentResponse {
    pub message: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

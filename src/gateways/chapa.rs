use crate::gateways::{CheckoutSession, GatewayError, InitializeRequest, PaymentGateway, VerifiedTransaction};
use serde_json::json;

pub struct ChapaGateway {
    pub base_url: String,
    pub secret_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

async fn read_reply(
    resp: Result<reqwest::Response, reqwest::Error>,
) -> Result<serde_json::Value, GatewayError> {
    let r = resp.map_err(classify_transport)?;
    let status = r.status();
    let text = r.text().await.map_err(classify_transport)?;
    let body: serde_json::Value =
        serde_json::from_str(&text).unwrap_or_else(|_| json!({ "raw": text.chars().take(500).collect::<String>() }));

    if !status.is_success() {
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    // Chapa signals failure in the envelope even on some 2xx replies.
    if body.get("status").and_then(|s| s.as_str()) != Some("success") {
        return Err(GatewayError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[async_trait::async_trait]
impl PaymentGateway for ChapaGateway {
    fn name(&self) -> &'static str {
        "chapa"
    }

    async fn initialize(&self, request: &InitializeRequest) -> Result<CheckoutSession, GatewayError> {
        let url = format!("{}/v1/transaction/initialize", self.base_url);
        let body = json!({
            "amount": request.amount.to_string(),
            "currency": request.currency,
            "email": request.email,
            "first_name": request.first_name,
            "last_name": request.last_name,
            "tx_ref": request.tx_ref,
            "callback_url": request.callback_url,
            "return_url": request.return_url,
        });

        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.secret_key)
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        let v = read_reply(resp).await?;
        parse_checkout(&v, &request.tx_ref).ok_or(GatewayError::Rejected {
            status: 200,
            body: v,
        })
    }

    async fn verify(&self, tx_ref: &str) -> Result<VerifiedTransaction, GatewayError> {
        let url = format!("{}/v1/transaction/verify/{}", self.base_url, tx_ref);

        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        let v = read_reply(resp).await?;
        Ok(parse_verification(v))
    }
}

fn classify_transport(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(e.to_string())
    }
}

fn parse_checkout(v: &serde_json::Value, tx_ref: &str) -> Option<CheckoutSession> {
    let data = v.get("data")?;
    let checkout_url = data.get("checkout_url")?.as_str()?.to_string();
    // Chapa keys transactions by tx_ref unless it hands back its own reference.
    let transaction_id = data
        .get("reference")
        .or_else(|| data.get("id"))
        .and_then(|id| id.as_str())
        .map(ToString::to_string)
        .or_else(|| Some(tx_ref.to_string()));

    Some(CheckoutSession {
        checkout_url,
        transaction_id,
    })
}

fn parse_verification(v: serde_json::Value) -> VerifiedTransaction {
    let data = v.get("data");
    let status = data
        .and_then(|d| d.get("status"))
        .and_then(|s| s.as_str())
        .unwrap_or("unknown")
        .to_string();
    let transaction_id = data
        .and_then(|d| d.get("reference"))
        .and_then(|r| r.as_str())
        .map(ToString::to_string);

    VerifiedTransaction {
        status,
        transaction_id,
        raw: v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hosted_link() {
        let v = json!({
            "message": "Hosted Link",
            "status": "success",
            "data": { "checkout_url": "https://checkout.chapa.co/checkout/payment/abc" }
        });
        let s = parse_checkout(&v, "ref-1").unwrap();
        assert_eq!(s.checkout_url, "https://checkout.chapa.co/checkout/payment/abc");
        assert_eq!(s.transaction_id.as_deref(), Some("ref-1"));
    }

    #[test]
    fn missing_checkout_url_is_not_a_session() {
        let v = json!({ "status": "success", "data": null });
        assert!(parse_checkout(&v, "ref-1").is_none());
    }

    #[test]
    fn verification_reads_nested_status() {
        let v = json!({
            "status": "success",
            "data": { "status": "failed", "reference": "APqz1", "tx_ref": "ref-1" }
        });
        let t = parse_verification(v);
        assert!(!t.is_success());
        assert_eq!(t.status, "failed");
        assert_eq!(t.transaction_id.as_deref(), Some("APqz1"));
    }
}

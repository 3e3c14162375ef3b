use crate::domain::payment::{InitiatePaymentRequest, VerifyPaymentQuery};
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

pub async fn initiate_payment(
    State(state): State<AppState>,
    body: Option<Json<InitiatePaymentRequest>>,
) -> impl IntoResponse {
    let booking_id = body.and_then(|Json(req)| req.booking_id);
    match state.payment_service.initiate(booking_id).await {
        Ok(resp) => (axum::http::StatusCode::CREATED, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn verify_payment(
    State(state): State<AppState>,
    Query(query): Query<VerifyPaymentQuery>,
) -> impl IntoResponse {
    match state.payment_service.verify(query.tx_ref.as_deref()).await {
        Ok(resp) => (axum::http::StatusCode::OK, Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (axum::http::StatusCode::OK, "ok")
}

pub async fn booking_payment(
    State(state): State<AppState>,
    axum::extract::Path(booking_id): axum::extract::Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = state
        .payment_service
        .payment_for_booking(booking_id)
        .await?
        .ok_or(ApiError::NotFound("payment"))?;
    Ok(Json(payment))
}

use crate::domain::booking::BookingInput;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_bookings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.bookings_repo.list_all().await?))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .bookings_repo
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    Ok(Json(booking))
}

async fn validate_against_listing(state: &AppState, req: &BookingInput) -> Result<(), ApiError> {
    req.validate().map_err(ApiError::Validation)?;
    let listing = state
        .listings_repo
        .get(req.listing_id)
        .await?
        .ok_or_else(|| ApiError::Validation(format!("listing {} does not exist", req.listing_id)))?;
    req.check_capacity(listing.max_guests)
        .map_err(ApiError::Validation)
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_against_listing(&state, &req).await?;
    let booking = state.bookings_repo.create(&req).await?;
    tracing::info!(booking_id = booking.id, listing_id = booking.listing_id, nights = req.nights(), "booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<BookingInput>,
) -> Result<impl IntoResponse, ApiError> {
    if state.bookings_repo.get(id).await?.is_none() {
        return Err(ApiError::NotFound("booking"));
    }
    // The payment amount was fixed at initiation.
    if state.payment_service.payment_for_booking(id).await?.is_some() {
        return Err(ApiError::Conflict(
            "booking has a payment and can no longer be changed".to_string(),
        ));
    }
    validate_against_listing(&state, &req).await?;

    let booking = state
        .bookings_repo
        .update(id, &req)
        .await?
        .ok_or(ApiError::NotFound("booking"))?;
    Ok(Json(booking))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.bookings_repo.delete(id).await? {
        return Err(ApiError::NotFound("booking"));
    }
    Ok(StatusCode::NO_CONTENT)
}

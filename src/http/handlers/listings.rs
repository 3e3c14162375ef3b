use crate::domain::listing::ListingInput;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_listings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.listings_repo.list_all().await?))
}

pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .listings_repo
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;
    Ok(Json(listing))
}

pub async fn create_listing(
    State(state): State<AppState>,
    Json(req): Json<ListingInput>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::Validation)?;
    let listing = state.listings_repo.create(&req).await?;
    tracing::info!(listing_id = listing.id, "listing created");
    Ok((StatusCode::CREATED, Json(listing)))
}

pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<ListingInput>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::Validation)?;
    let listing = state
        .listings_repo
        .update(id, &req)
        .await?
        .ok_or(ApiError::NotFound("listing"))?;
    Ok(Json(listing))
}

pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.listings_repo.delete(id).await? {
        return Err(ApiError::NotFound("listing"));
    }
    Ok(StatusCode::NO_CONTENT)
}

use crate::domain::review::ReviewInput;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn list_reviews(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if state.listings_repo.get(listing_id).await?.is_none() {
        return Err(ApiError::NotFound("listing"));
    }
    Ok(Json(state.reviews_repo.list_for_listing(listing_id).await?))
}

pub async fn create_review(
    State(state): State<AppState>,
    Path(listing_id): Path<i64>,
    Json(req): Json<ReviewInput>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate().map_err(ApiError::Validation)?;
    if state.listings_repo.get(listing_id).await?.is_none() {
        return Err(ApiError::NotFound("listing"));
    }
    let review = state.reviews_repo.create(listing_id, &req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .reviews_repo
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("review"))?;
    Ok(Json(review))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.reviews_repo.delete(id).await? {
        return Err(ApiError::NotFound("review"));
    }
    Ok(StatusCode::NO_CONTENT)
}

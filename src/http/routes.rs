use crate::http::handlers::{bookings, listings, ops, payments, reviews};
use crate::http::middleware::api_key::require_api_key_for_writes;
use crate::AppState;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

pub fn router(state: AppState, api_key: String) -> Router {
    let api_routes = Router::new()
        .route(
            "/listings",
            get(listings::list_listings).post(listings::create_listing),
        )
        .route(
            "/listings/:id",
            get(listings::get_listing)
                .put(listings::update_listing)
                .delete(listings::delete_listing),
        )
        .route(
            "/listings/:id/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/:id",
            get(reviews::get_review).delete(reviews::delete_review),
        )
        .route(
            "/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/bookings/:id/payment", get(payments::booking_payment))
        .route("/payments/initiate/", post(payments::initiate_payment))
        .route("/payments/verify/", get(payments::verify_payment))
        .layer(from_fn_with_state(api_key, require_api_key_for_writes));

    Router::new()
        .route("/health", get(payments::health))
        .route("/ops/readiness", get(ops::readiness))
        .route("/ops/liveness", get(ops::liveness))
        .merge(api_routes)
        .with_state(state)
}

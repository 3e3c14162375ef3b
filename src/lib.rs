pub mod config;
pub mod domain {
    pub mod booking;
    pub mod listing;
    pub mod payment;
    pub mod review;
}
pub mod error;
pub mod gateways;
pub mod http {
    pub mod handlers {
        pub mod bookings;
        pub mod listings;
        pub mod ops;
        pub mod payments;
        pub mod reviews;
    }
    pub mod middleware {
        pub mod api_key;
    }
    pub mod routes;
}
pub mod repo {
    pub mod bookings_repo;
    pub mod in_memory;
    pub mod ledger;
    pub mod listings_repo;
    pub mod payments_repo;
    pub mod reviews_repo;
    pub mod users_repo;
}
pub mod service {
    pub mod payment_service;
    pub mod retry;
}

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::PgPool,
    pub payment_service: service::payment_service::PaymentService,
    pub listings_repo: repo::listings_repo::ListingsRepo,
    pub bookings_repo: repo::bookings_repo::BookingsRepo,
    pub reviews_repo: repo::reviews_repo::ReviewsRepo,
}

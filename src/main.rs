use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use travel_booking::config::AppConfig;
use travel_booking::gateways::chapa::ChapaGateway;
use travel_booking::gateways::mock::MockGateway;
use travel_booking::gateways::PaymentGateway;
use travel_booking::repo::bookings_repo::BookingsRepo;
use travel_booking::repo::listings_repo::ListingsRepo;
use travel_booking::repo::payments_repo::PaymentsRepo;
use travel_booking::repo::reviews_repo::ReviewsRepo;
use travel_booking::service::payment_service::{CheckoutSettings, PaymentService};
use travel_booking::AppState;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let gateway: Arc<dyn PaymentGateway> = if cfg.gateway.adapter_type == "CHAPA" {
        if cfg.gateway.secret_key.is_empty() {
            tracing::warn!("CHAPA_SECRET_KEY is not set, gateway calls will be rejected");
        }
        Arc::new(ChapaGateway {
            base_url: cfg.gateway.base_url.clone(),
            secret_key: cfg.gateway.secret_key.clone(),
            timeout_ms: cfg.gateway.timeout_ms,
            client: reqwest::Client::new(),
        })
    } else {
        Arc::new(MockGateway::new(&cfg.gateway.adapter_type))
    };
    tracing::info!(gateway = gateway.name(), "payment gateway configured");

    let payment_service = PaymentService {
        ledger: Arc::new(PaymentsRepo { pool: pool.clone() }),
        gateway,
        checkout: CheckoutSettings {
            currency: cfg.gateway.currency.clone(),
            callback_url: cfg.gateway.callback_url.clone(),
            return_url: cfg.gateway.return_url.clone(),
        },
        retry: cfg.retry.clone(),
    };

    let state = AppState {
        pool: pool.clone(),
        payment_service,
        listings_repo: ListingsRepo { pool: pool.clone() },
        bookings_repo: BookingsRepo { pool: pool.clone() },
        reviews_repo: ReviewsRepo { pool: pool.clone() },
    };

    let app = travel_booking::http::routes::router(state, cfg.api_key.clone());

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

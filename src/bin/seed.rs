use anyhow::Result;
use clap::Parser;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use travel_booking::config::AppConfig;
use travel_booking::domain::listing::ListingInput;
use travel_booking::repo::listings_repo::ListingsRepo;
use travel_booking::repo::users_repo::UsersRepo;

/// Seed the database with sample listings.
#[derive(Parser, Debug)]
#[command(name = "seed")]
struct Args {
    /// Delete existing listings before seeding.
    #[arg(long)]
    reset: bool,
}

const SAMPLE_LISTINGS: [(&str, &str, &str, i32); 3] = [
    ("Sunny Studio", "Cozy spot near park", "59.00", 2),
    ("City Loft", "Downtown loft w/ skyline view", "120.00", 4),
    ("Beach Cottage", "Steps from the sand", "200.00", 6),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = AppConfig::from_env();
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&cfg.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let listings = ListingsRepo { pool: pool.clone() };
    let users = UsersRepo { pool };

    if args.reset {
        let removed = listings.delete_all().await?;
        tracing::warn!(removed, "cleared listings");
    }

    let host_id = users.get_or_create("host1", "host1@example.com").await?;

    let mut created = 0;
    for (title, description, price, max_guests) in SAMPLE_LISTINGS {
        if listings.find_by_title(title).await?.is_some() {
            continue;
        }
        let input = ListingInput {
            title: title.to_string(),
            description: description.to_string(),
            price_per_night: Decimal::from_str(price)?,
            max_guests,
            host_id,
        };
        input.validate().map_err(anyhow::Error::msg)?;
        listings.create(&input).await?;
        created += 1;
    }

    tracing::info!(created, "seed complete");
    println!("Seed complete. Created {created} listings.");
    Ok(())
}

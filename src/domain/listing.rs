use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price_per_night: Decimal,
    pub max_guests: i32,
    pub host_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Body for both create and full update.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price_per_night: Decimal,
    #[serde(default = "default_max_guests")]
    pub max_guests: i32,
    pub host_id: i64,
}

fn default_max_guests() -> i32 {
    1
}

impl ListingInput {
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("title must not be empty".to_string());
        }
        if title.chars().count() > 200 {
            return Err("title must be at most 200 characters".to_string());
        }
        if self.price_per_night.is_sign_negative() {
            return Err("price_per_night must be >= 0".to_string());
        }
        if self.price_per_night.scale() > 2 {
            return Err("price_per_night allows at most 2 decimal places".to_string());
        }
        if self.max_guests < 1 {
            return Err("max_guests must be >= 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input() -> ListingInput {
        ListingInput {
            title: "City Loft".to_string(),
            description: String::new(),
            price_per_night: dec!(120.00),
            max_guests: 4,
            host_id: 1,
        }
    }

    #[test]
    fn accepts_valid_listing() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn rejects_blank_title_and_bad_price() {
        let mut l = input();
        l.title = "   ".to_string();
        assert!(l.validate().is_err());

        let mut l = input();
        l.price_per_night = dec!(-1);
        assert!(l.validate().is_err());

        let mut l = input();
        l.price_per_night = dec!(10.005);
        assert!(l.validate().is_err());
    }

    #[test]
    fn defaults_max_guests_to_one() {
        let l: ListingInput = serde_json::from_value(serde_json::json!({
            "title": "Sunny Studio",
            "price_per_night": "59.00",
            "host_id": 1
        }))
        .unwrap();
        assert_eq!(l.max_guests, 1);
        assert_eq!(l.price_per_night, dec!(59.00));
    }
}

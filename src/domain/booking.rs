use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: i64,
    pub listing_id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub guests: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingInput {
    pub listing_id: i64,
    pub guest_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_guests")]
    pub guests: i32,
}

fn default_guests() -> i32 {
    1
}

impl BookingInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.start_date >= self.end_date {
            return Err("start_date must be before end_date".to_string());
        }
        if self.guests < 1 {
            return Err("guests must be >= 1".to_string());
        }
        Ok(())
    }

    /// Capacity is a property of the listing, so it is checked once the listing is loaded.
    pub fn check_capacity(&self, max_guests: i32) -> Result<(), String> {
        if self.guests > max_guests {
            return Err(format!("listing accepts at most {max_guests} guests"));
        }
        Ok(())
    }

    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

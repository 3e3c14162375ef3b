use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: i64,
    pub listing_id: i64,
    pub reviewer_id: i64,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub reviewer_id: i64,
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

impl ReviewInput {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=5).contains(&self.rating) {
            return Err("rating must be between 1 and 5".to_string());
        }
        Ok(())
    }
}

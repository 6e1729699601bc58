use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A time-boxed release campaign.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Drop {
    pub id: String,
    pub number: i32,
    pub label: String,
    pub tagline: String,
    pub description: String,
    pub hero_image: String,
    pub hero_image2: Option<String>,
    pub accent_color: String,
    pub release_date: NaiveDate,
    pub total_pieces: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDropRequest {
    pub id: Option<String>,
    pub number: Option<i32>,
    pub label: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub hero_image: Option<String>,
    pub hero_image2: Option<String>,
    pub accent_color: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub total_pieces: Option<i32>,
    pub active: Option<bool>,
}

/// Partial update. Omitted fields keep their stored value, except
/// `hero_image2`, which is written verbatim: omitting it clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateDropRequest {
    pub number: Option<i32>,
    pub label: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub hero_image: Option<String>,
    pub hero_image2: Option<String>,
    pub accent_color: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub total_pieces: Option<i32>,
    pub active: Option<bool>,
}

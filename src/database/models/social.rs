use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Social {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewSocial {
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct SocialChanges {
    pub name: String,
    pub social_media_url: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    /// Nulled by the database if the owner row is physically removed
    pub user_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

#[derive(Debug, Clone)]
pub struct PhotoChanges {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
}

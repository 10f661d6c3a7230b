use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validate::{Field, Rule, Validate};
use crate::database::models::Photo;

const TITLE_RULES: &[Rule] = &[Rule::Required("Title is required")];
const CAPTION_RULES: &[Rule] = &[Rule::Required("Caption is required")];
const PHOTO_URL_RULES: &[Rule] = &[Rule::Required("Photo url is required")];

/// Body of both create and update
#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub photo_url: Option<String>,
}

impl Validate for PhotoRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("title", self.title.as_deref(), TITLE_RULES),
            Field::text("caption", self.caption.as_deref(), CAPTION_RULES),
            Field::text("photo_url", self.photo_url.as_deref(), PHOTO_URL_RULES),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: photo.user_id,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

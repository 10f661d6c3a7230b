use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validate::{Field, Rule, Validate};
use crate::database::models::Social;

const NAME_RULES: &[Rule] = &[Rule::Required("Your name is required")];
const URL_RULES: &[Rule] = &[Rule::Required("Social media url is required")];

#[derive(Debug, Deserialize)]
pub struct SocialRequest {
    pub name: Option<String>,
    pub social_media_url: Option<String>,
}

impl Validate for SocialRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("name", self.name.as_deref(), NAME_RULES),
            Field::text("social_media_url", self.social_media_url.as_deref(), URL_RULES),
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct SocialResponse {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Social> for SocialResponse {
    fn from(social: Social) -> Self {
        Self {
            id: social.id,
            name: social.name,
            social_media_url: social.social_media_url,
            user_id: social.user_id,
            created_at: social.created_at,
            updated_at: social.updated_at,
        }
    }
}

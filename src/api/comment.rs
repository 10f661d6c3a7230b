use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::validate::{Field, Rule, Validate};
use crate::database::models::Comment;

const MESSAGE_RULES: &[Rule] = &[Rule::Required("Message is required")];
const PHOTO_ID_RULES: &[Rule] = &[Rule::Required("Photo id is required")];

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub message: Option<String>,
    pub photo_id: Option<i64>,
}

impl Validate for CommentRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            Field::text("message", self.message.as_deref(), MESSAGE_RULES),
            Field::number("photo_id", self.photo_id, PHOTO_ID_RULES),
        ]
    }
}

/// Only the message of an existing comment can change
#[derive(Debug, Deserialize)]
pub struct CommentUpdateRequest {
    pub message: Option<String>,
}

impl Validate for CommentUpdateRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text("message", self.message.as_deref(), MESSAGE_RULES)]
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub message: String,
    pub photo_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            message: comment.message,
            photo_id: comment.photo_id,
            user_id: comment.user_id,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_needs_message_and_photo() {
        let req = CommentRequest { message: Some("nice".into()), photo_id: None };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "photo_id");
    }

    #[test]
    fn update_needs_message() {
        assert!(CommentUpdateRequest { message: Some("".into()) }.validate().is_err());
        assert!(CommentUpdateRequest { message: Some("ok".into()) }.validate().is_ok());
    }
}

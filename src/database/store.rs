use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    Comment, NewComment, NewPhoto, NewSocial, NewUser, Photo, PhotoChanges, Social, SocialChanges,
    User, UserChanges,
};

/// Closed set of store failures; handlers branch on the kind, never the text
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal store error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// Every lookup ignores soft-deleted rows.

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<User>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User>;
    async fn delete_user(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Fails with `NotFound` if the owning user does not exist
    async fn create_photo(&self, photo: NewPhoto) -> StoreResult<Photo>;
    async fn find_photo(&self, id: i64) -> StoreResult<Photo>;
    async fn list_photos_by_user(&self, user_id: i64) -> StoreResult<Vec<Photo>>;
    async fn update_photo(&self, id: i64, changes: PhotoChanges) -> StoreResult<Photo>;
    async fn delete_photo(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Fails with `NotFound` if either the user or the photo does not exist
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment>;
    async fn find_comment(&self, id: i64) -> StoreResult<Comment>;
    async fn list_comments(&self) -> StoreResult<Vec<Comment>>;
    async fn update_comment(&self, id: i64, message: String) -> StoreResult<Comment>;
    async fn delete_comment(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait SocialStore: Send + Sync {
    async fn create_social(&self, social: NewSocial) -> StoreResult<Social>;
    async fn find_social(&self, id: i64) -> StoreResult<Social>;
    async fn list_socials_by_user(&self, user_id: i64) -> StoreResult<Vec<Social>>;
    async fn update_social(&self, id: i64, changes: SocialChanges) -> StoreResult<Social>;
    async fn delete_social(&self, id: i64) -> StoreResult<()>;
}

/// Full capability set injected into the handlers
#[async_trait]
pub trait Store: UserStore + PhotoStore + CommentStore + SocialStore {
    async fn health_check(&self) -> StoreResult<()>;
}

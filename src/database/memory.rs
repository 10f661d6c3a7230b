use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::models::{
    Comment, NewComment, NewPhoto, NewSocial, NewUser, Photo, PhotoChanges, Social, SocialChanges,
    User, UserChanges,
};
use crate::database::store::{
    CommentStore, PhotoStore, SocialStore, Store, StoreError, StoreResult, UserStore,
};

/// Process-local store with the same visibility and uniqueness rules as the
/// PostgreSQL schema. Used by `serve --in-memory` and the test suites.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    photos: BTreeMap<i64, Photo>,
    comments: BTreeMap<i64, Comment>,
    socials: BTreeMap<i64, Social>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn live_user(&self, id: i64) -> Option<&User> {
        self.users.get(&id).filter(|u| u.deleted_at.is_none())
    }

    fn live_photo(&self, id: i64) -> Option<&Photo> {
        self.photos.get(&id).filter(|p| p.deleted_at.is_none())
    }

    /// Unique username/email, ignoring the row being updated
    fn check_unique(&self, username: &str, email: &str, except: Option<i64>) -> StoreResult<()> {
        for user in self.users.values().filter(|u| Some(u.id) != except) {
            if user.email == email {
                return Err(StoreError::Conflict("email is already taken".to_string()));
            }
            if user.username == username {
                return Err(StoreError::Conflict("username is already taken".to_string()));
            }
        }
        Ok(())
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity: &str) -> StoreError {
    StoreError::NotFound(format!("{entity} not found"))
}

/// Look up a live row for mutation
fn live_mut<'a, T>(
    rows: &'a mut BTreeMap<i64, T>,
    id: i64,
    deleted: impl Fn(&T) -> bool,
    entity: &str,
) -> StoreResult<&'a mut T> {
    rows.get_mut(&id)
        .filter(|row| !deleted(row))
        .ok_or_else(|| not_found(entity))
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        tables.check_unique(&user.username, &user.email, None)?;

        let now = Some(Utc::now());
        let id = tables.allocate_id();
        let row = User {
            id,
            username: user.username,
            email: user.email,
            password: user.password,
            age: user.age,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.deleted_at.is_none() && u.email == email)
            .cloned()
            .ok_or_else(|| not_found("user"))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().filter(|u| u.deleted_at.is_none()).cloned().collect())
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        let current = tables.live_user(id).cloned().ok_or_else(|| not_found("user"))?;

        let username = changes.username.unwrap_or(current.username);
        let email = changes.email.unwrap_or(current.email);
        tables.check_unique(&username, &email, Some(id))?;

        let row = live_mut(&mut tables.users, id, |u| u.deleted_at.is_some(), "user")?;
        row.username = username;
        row.email = email;
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.users, id, |u| u.deleted_at.is_some(), "user")?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl PhotoStore for InMemoryStore {
    async fn create_photo(&self, photo: NewPhoto) -> StoreResult<Photo> {
        let mut tables = self.tables.write().await;
        if tables.live_user(photo.user_id).is_none() {
            return Err(not_found("user"));
        }

        let now = Some(Utc::now());
        let id = tables.allocate_id();
        let row = Photo {
            id,
            title: photo.title,
            caption: photo.caption,
            photo_url: photo.photo_url,
            user_id: Some(photo.user_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.photos.insert(id, row.clone());
        Ok(row)
    }

    async fn find_photo(&self, id: i64) -> StoreResult<Photo> {
        let tables = self.tables.read().await;
        tables.live_photo(id).cloned().ok_or_else(|| not_found("photo"))
    }

    async fn list_photos_by_user(&self, user_id: i64) -> StoreResult<Vec<Photo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .photos
            .values()
            .filter(|p| p.deleted_at.is_none() && p.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn update_photo(&self, id: i64, changes: PhotoChanges) -> StoreResult<Photo> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.photos, id, |p| p.deleted_at.is_some(), "photo")?;
        row.title = changes.title;
        row.caption = changes.caption;
        row.photo_url = changes.photo_url;
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete_photo(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.photos, id, |p| p.deleted_at.is_some(), "photo")?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        if tables.live_photo(comment.photo_id).is_none() {
            return Err(not_found("photo"));
        }
        if tables.live_user(comment.user_id).is_none() {
            return Err(not_found("user"));
        }

        let now = Some(Utc::now());
        let id = tables.allocate_id();
        let row = Comment {
            id,
            message: comment.message,
            photo_id: Some(comment.photo_id),
            user_id: Some(comment.user_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.comments.insert(id, row.clone());
        Ok(row)
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Comment> {
        let tables = self.tables.read().await;
        tables
            .comments
            .get(&id)
            .filter(|c| c.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| not_found("comment"))
    }

    async fn list_comments(&self) -> StoreResult<Vec<Comment>> {
        let tables = self.tables.read().await;
        Ok(tables.comments.values().filter(|c| c.deleted_at.is_none()).cloned().collect())
    }

    async fn update_comment(&self, id: i64, message: String) -> StoreResult<Comment> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.comments, id, |c| c.deleted_at.is_some(), "comment")?;
        row.message = message;
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.comments, id, |c| c.deleted_at.is_some(), "comment")?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl SocialStore for InMemoryStore {
    async fn create_social(&self, social: NewSocial) -> StoreResult<Social> {
        let mut tables = self.tables.write().await;
        if tables.live_user(social.user_id).is_none() {
            return Err(not_found("user"));
        }

        let now = Some(Utc::now());
        let id = tables.allocate_id();
        let row = Social {
            id,
            name: social.name,
            social_media_url: social.social_media_url,
            user_id: Some(social.user_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.socials.insert(id, row.clone());
        Ok(row)
    }

    async fn find_social(&self, id: i64) -> StoreResult<Social> {
        let tables = self.tables.read().await;
        tables
            .socials
            .get(&id)
            .filter(|s| s.deleted_at.is_none())
            .cloned()
            .ok_or_else(|| not_found("social media"))
    }

    async fn list_socials_by_user(&self, user_id: i64) -> StoreResult<Vec<Social>> {
        let tables = self.tables.read().await;
        Ok(tables
            .socials
            .values()
            .filter(|s| s.deleted_at.is_none() && s.user_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn update_social(&self, id: i64, changes: SocialChanges) -> StoreResult<Social> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.socials, id, |s| s.deleted_at.is_some(), "social media")?;
        row.name = changes.name;
        row.social_media_url = changes.social_media_url;
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete_social(&self, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = live_mut(&mut tables.socials, id, |s| s.deleted_at.is_some(), "social media")?;
        row.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            age: 20,
        }
    }

    fn new_photo(user_id: i64) -> NewPhoto {
        NewPhoto {
            title: "t".to_string(),
            caption: "c".to_string(),
            photo_url: "http://x/y.png".to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn create_sets_id_and_timestamps() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("al", "a@b.com")).await.unwrap();
        assert!(user.id > 0);
        assert!(user.created_at.is_some());
        assert!(user.updated_at.is_some());
        assert!(user.deleted_at.is_none());
    }

    #[tokio::test]
    async fn duplicate_email_or_username_conflicts() {
        let store = InMemoryStore::new();
        store.create_user(new_user("al", "a@b.com")).await.unwrap();

        let same_email = store.create_user(new_user("bo", "a@b.com")).await;
        assert!(matches!(same_email, Err(StoreError::Conflict(_))));

        let same_name = store.create_user(new_user("al", "c@d.com")).await;
        assert!(matches!(same_name, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_user_keeps_unspecified_fields() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("al", "a@b.com")).await.unwrap();
        let updated = store
            .update_user(user.id, UserChanges { username: Some("al2".into()), email: None })
            .await
            .unwrap();
        assert_eq!(updated.username, "al2");
        assert_eq!(updated.email, "a@b.com");
    }

    #[tokio::test]
    async fn soft_deleted_rows_are_invisible() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("al", "a@b.com")).await.unwrap();
        let photo = store.create_photo(new_photo(user.id)).await.unwrap();

        store.delete_photo(photo.id).await.unwrap();
        assert!(matches!(store.find_photo(photo.id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_photo(photo.id).await, Err(StoreError::NotFound(_))));
        assert!(store.list_photos_by_user(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_requires_live_owner() {
        let store = InMemoryStore::new();
        assert!(matches!(store.create_photo(new_photo(99)).await, Err(StoreError::NotFound(_))));

        let user = store.create_user(new_user("al", "a@b.com")).await.unwrap();
        store.delete_user(user.id).await.unwrap();
        assert!(matches!(store.create_photo(new_photo(user.id)).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn comment_requires_live_photo() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("al", "a@b.com")).await.unwrap();
        let result = store
            .create_comment(NewComment { message: "hi".into(), photo_id: 12345, user_id: user.id })
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn photo_listing_is_scoped_to_owner() {
        let store = InMemoryStore::new();
        let a = store.create_user(new_user("a", "a@x.com")).await.unwrap();
        let b = store.create_user(new_user("b", "b@x.com")).await.unwrap();
        store.create_photo(new_photo(a.id)).await.unwrap();
        store.create_photo(new_photo(b.id)).await.unwrap();

        let photos = store.list_photos_by_user(a.id).await.unwrap();
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].user_id, Some(a.id));
    }
}

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseManager;
use crate::database::models::{
    Comment, NewComment, NewPhoto, NewSocial, NewUser, Photo, PhotoChanges, Social, SocialChanges,
    User, UserChanges,
};
use crate::database::store::{
    CommentStore, PhotoStore, SocialStore, Store, StoreError, StoreResult, UserStore,
};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL-backed store; soft-deleted rows are filtered in every statement
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Translate a driver error into the store's closed error kind
fn store_error(err: sqlx::Error, entity: &str) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound(format!("{entity} not found")),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                let field = match db.constraint() {
                    Some(c) if c.contains("email") => "email",
                    Some(c) if c.contains("username") => "username",
                    _ => "value",
                };
                StoreError::Conflict(format!("{field} is already taken"))
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                StoreError::NotFound("referenced record not found".to_string())
            }
            _ => StoreError::Internal(db.to_string()),
        },
        other => StoreError::Internal(other.to_string()),
    }
}

fn soft_deleted(rows_affected: u64, entity: &str) -> StoreResult<()> {
    if rows_affected == 0 {
        Err(StoreError::NotFound(format!("{entity} not found")))
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password, age) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user.username)
        .bind(user.email)
        .bind(user.password)
        .bind(user.age)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, "user"))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(e, "user"))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE deleted_at IS NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(e, "user"))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, "user"))
    }

    async fn delete_user(&self, id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE users SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| store_error(e, "user"))?;
        soft_deleted(result.rows_affected(), "user")
    }
}

#[async_trait]
impl PhotoStore for PgStore {
    async fn create_photo(&self, photo: NewPhoto) -> StoreResult<Photo> {
        // owner existence is checked in the same statement as the insert
        sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (title, caption, photo_url, user_id)
            SELECT $1, $2, $3, u.id FROM users u
            WHERE u.id = $4 AND u.deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(photo.title)
        .bind(photo.caption)
        .bind(photo.photo_url)
        .bind(photo.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(e, "photo"))?
        .ok_or_else(|| StoreError::NotFound("user not found".to_string()))
    }

    async fn find_photo(&self, id: i64) -> StoreResult<Photo> {
        sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(e, "photo"))
    }

    async fn list_photos_by_user(&self, user_id: i64) -> StoreResult<Vec<Photo>> {
        sqlx::query_as::<_, Photo>(
            "SELECT * FROM photos WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(e, "photo"))
    }

    async fn update_photo(&self, id: i64, changes: PhotoChanges) -> StoreResult<Photo> {
        sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
            SET title = $2, caption = $3, photo_url = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.caption)
        .bind(changes.photo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, "photo"))
    }

    async fn delete_photo(&self, id: i64) -> StoreResult<()> {
        let result =
            sqlx::query("UPDATE photos SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| store_error(e, "photo"))?;
        soft_deleted(result.rows_affected(), "photo")
    }
}

#[async_trait]
impl CommentStore for PgStore {
    async fn create_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (message, photo_id, user_id)
            SELECT $1, p.id, u.id FROM photos p, users u
            WHERE p.id = $2 AND p.deleted_at IS NULL
              AND u.id = $3 AND u.deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(comment.message)
        .bind(comment.photo_id)
        .bind(comment.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(e, "comment"))?
        .ok_or_else(|| StoreError::NotFound("photo not found".to_string()))
    }

    async fn find_comment(&self, id: i64) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(e, "comment"))
    }

    async fn list_comments(&self) -> StoreResult<Vec<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE deleted_at IS NULL ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error(e, "comment"))
    }

    async fn update_comment(&self, id: i64, message: String) -> StoreResult<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET message = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(message)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, "comment"))
    }

    async fn delete_comment(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error(e, "comment"))?;
        soft_deleted(result.rows_affected(), "comment")
    }
}

#[async_trait]
impl SocialStore for PgStore {
    async fn create_social(&self, social: NewSocial) -> StoreResult<Social> {
        sqlx::query_as::<_, Social>(
            r#"
            INSERT INTO socials (name, social_media_url, user_id)
            SELECT $1, $2, u.id FROM users u
            WHERE u.id = $3 AND u.deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(social.name)
        .bind(social.social_media_url)
        .bind(social.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| store_error(e, "social media"))?
        .ok_or_else(|| StoreError::NotFound("user not found".to_string()))
    }

    async fn find_social(&self, id: i64) -> StoreResult<Social> {
        sqlx::query_as::<_, Social>("SELECT * FROM socials WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| store_error(e, "social media"))
    }

    async fn list_socials_by_user(&self, user_id: i64) -> StoreResult<Vec<Social>> {
        sqlx::query_as::<_, Social>(
            "SELECT * FROM socials WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error(e, "social media"))
    }

    async fn update_social(&self, id: i64, changes: SocialChanges) -> StoreResult<Social> {
        sqlx::query_as::<_, Social>(
            r#"
            UPDATE socials
            SET name = $2, social_media_url = $3, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.social_media_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| store_error(e, "social media"))
    }

    async fn delete_social(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE socials SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error(e, "social media"))?;
        soft_deleted(result.rows_affected(), "social media")
    }
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        DatabaseManager::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::Internal(e.to_string()))
    }
}

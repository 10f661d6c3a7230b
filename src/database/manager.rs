use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Table definitions, applied in dependency order
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          BIGSERIAL PRIMARY KEY,
        username    TEXT NOT NULL,
        email       TEXT NOT NULL,
        password    TEXT NOT NULL,
        age         INTEGER NOT NULL,
        created_at  TIMESTAMPTZ DEFAULT NOW(),
        updated_at  TIMESTAMPTZ DEFAULT NOW(),
        deleted_at  TIMESTAMPTZ
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username ON users (username)",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users (email)",
    "CREATE INDEX IF NOT EXISTS idx_users_deleted_at ON users (deleted_at)",
    r#"
    CREATE TABLE IF NOT EXISTS socials (
        id                BIGSERIAL PRIMARY KEY,
        name              TEXT NOT NULL,
        social_media_url  TEXT NOT NULL,
        user_id           BIGINT REFERENCES users (id) ON UPDATE CASCADE ON DELETE SET NULL,
        created_at        TIMESTAMPTZ DEFAULT NOW(),
        updated_at        TIMESTAMPTZ DEFAULT NOW(),
        deleted_at        TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_socials_deleted_at ON socials (deleted_at)",
    r#"
    CREATE TABLE IF NOT EXISTS photos (
        id          BIGSERIAL PRIMARY KEY,
        title       TEXT NOT NULL,
        caption     TEXT NOT NULL,
        photo_url   TEXT NOT NULL,
        user_id     BIGINT REFERENCES users (id) ON UPDATE CASCADE ON DELETE SET NULL,
        created_at  TIMESTAMPTZ DEFAULT NOW(),
        updated_at  TIMESTAMPTZ DEFAULT NOW(),
        deleted_at  TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_photos_deleted_at ON photos (deleted_at)",
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id          BIGSERIAL PRIMARY KEY,
        message     TEXT NOT NULL,
        photo_id    BIGINT REFERENCES photos (id) ON UPDATE CASCADE ON DELETE SET NULL,
        user_id     BIGINT REFERENCES users (id) ON UPDATE CASCADE ON DELETE SET NULL,
        created_at  TIMESTAMPTZ DEFAULT NOW(),
        updated_at  TIMESTAMPTZ DEFAULT NOW(),
        deleted_at  TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_comments_deleted_at ON comments (deleted_at)",
];

/// Connection pool bootstrap and schema management
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        if config.url.is_empty() {
            return Err(DatabaseError::ConfigMissing("DATABASE_URL"));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(pool)
    }

    /// Create tables and indexes that do not exist yet
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
        }

        info!("Database schema is up to date ({} statements)", SCHEMA.len());
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_created_before_their_dependents() {
        let position = |needle: &str| {
            SCHEMA
                .iter()
                .position(|s| s.contains(needle))
                .unwrap_or_else(|| panic!("missing {needle}"))
        };

        let users = position("CREATE TABLE IF NOT EXISTS users");
        let photos = position("CREATE TABLE IF NOT EXISTS photos");
        assert!(users < photos);
        assert!(users < position("CREATE TABLE IF NOT EXISTS socials"));
        assert!(photos < position("CREATE TABLE IF NOT EXISTS comments"));
    }

    #[tokio::test]
    async fn connect_requires_url() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            connection_timeout: 1,
        };
        assert!(matches!(
            DatabaseManager::connect(&config).await,
            Err(DatabaseError::ConfigMissing(_))
        ));
    }
}

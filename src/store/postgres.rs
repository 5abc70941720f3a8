use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use super::{PostStore, Result, StoreError};
use crate::config::DatabaseConfig;
use crate::post::{NewPost, Post, PostChanges, PostId};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const COLUMNS: &str = "id, title, image, body, created";

/// Posts in a PostgreSQL `posts` table.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl fmt::Debug for PgStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgStore")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl PgStore {
    /// Opens a pool and verifies it with one connection.
    pub async fn connect(cfg: &DatabaseConfig) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .connect(&cfg.url)
            .await?;
        info!(max_connections = cfg.max_connections, "connected to database");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn list_all(&self) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {COLUMNS} FROM posts ORDER BY created ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    async fn create(&self, post: NewPost) -> Result<Post> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "INSERT INTO posts (title, image, body) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(post.title)
        .bind(post.image)
        .bind(post.body)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    async fn get_by_id(&self, id: PostId) -> Result<Post> {
        sqlx::query_as::<_, Post>(&format!("SELECT {COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, id: PostId, changes: PostChanges) -> Result<Post> {
        let (set_image, image) = match changes.image {
            Some(image) => (true, image),
            None => (false, None),
        };
        sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                image = CASE WHEN $3 THEN $4 ELSE image END,
                body  = COALESCE($5, body)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title)
        .bind(set_image)
        .bind(image)
        .bind(changes.body)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_by_id(&self, id: PostId) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

//! Persistence for posts.
//!
//! Handlers only ever see `Arc<dyn PostStore>`; which backend sits behind it
//! is decided once in `main` from configuration.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::post::{NewPost, Post, PostChanges, PostId};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// No post has the requested id.
    #[error("post not found")]
    NotFound,

    /// The backend could not be read or written.
    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other.to_string()),
        }
    }
}

/// The post collection.
///
/// Implementations must be safe to call from many requests at once; each
/// call is a single round trip with no cross-call transaction.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every stored post, in the backend's default order (creation order).
    async fn list_all(&self) -> Result<Vec<Post>>;

    /// Persists `post`, assigning its id and creation time. The body must
    /// already be sanitized.
    async fn create(&self, post: NewPost) -> Result<Post>;

    async fn get_by_id(&self, id: PostId) -> Result<Post>;

    /// Overwrites the supplied fields and returns the updated post.
    async fn update_by_id(&self, id: PostId, changes: PostChanges) -> Result<Post>;

    /// Permanently removes the post.
    async fn delete_by_id(&self, id: PostId) -> Result<()>;

    /// Cheap connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<()>;
}

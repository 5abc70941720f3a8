use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::{PostStore, Result, StoreError};
use crate::post::{NewPost, Post, PostChanges, PostId};

/// A process-local store. Posts are kept in creation order and vanish with
/// the process; useful for development and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Post>>> {
        self.posts.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Post>>> {
        self.posts.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Database("memory store lock poisoned".to_owned())
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Post>> {
        Ok(self.read()?.clone())
    }

    async fn create(&self, post: NewPost) -> Result<Post> {
        let post = Post {
            id: PostId::new_v4(),
            title: post.title,
            image: post.image,
            body: post.body,
            created: Utc::now(),
        };
        self.write()?.push(post.clone());
        debug!(post_id = %post.id, "post stored in memory");
        Ok(post)
    }

    async fn get_by_id(&self, id: PostId) -> Result<Post> {
        self.read()?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update_by_id(&self, id: PostId, changes: PostChanges) -> Result<Post> {
        let mut posts = self.write()?;
        let post = posts.iter_mut().find(|p| p.id == id).ok_or(StoreError::NotFound)?;
        changes.apply(post);
        Ok(post.clone())
    }

    async fn delete_by_id(&self, id: PostId) -> Result<()> {
        let mut posts = self.write()?;
        let index = posts.iter().position(|p| p.id == id).ok_or(StoreError::NotFound)?;
        posts.remove(index);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;

    #[tokio::test]
    async fn create_then_get() {
        conformance::create_then_get(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        conformance::update_changes_only_supplied_fields(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn update_can_clear_image() {
        conformance::update_can_clear_image(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        conformance::delete_then_get_is_not_found(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        conformance::missing_ids_are_not_found(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn list_returns_each_post_once() {
        conformance::list_returns_each_post_once(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn list_keeps_creation_order() {
        let store = MemoryStore::new();
        for title in ["a", "b", "c"] {
            store
                .create(NewPost { title: title.into(), ..NewPost::default() })
                .await
                .expect("create");
        }
        let titles: Vec<_> = store.list_all().await.expect("list")
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }
}

//! Post and account repositories
//!
//! Storage traits plus in-memory implementations for tests and development.

use std::cmp::Ordering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error::DatabaseError;

use crate::models::{Account, NewPost, Post, PostStatus};

/// Storage operations for posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new draft post and return it with its assigned id
    async fn insert(&self, post: &NewPost) -> Result<Post, DatabaseError>;

    /// Replace title, content and tags of an existing post
    async fn update(&self, id: &str, post: &NewPost) -> Result<Post, DatabaseError>;

    /// Mark a post published at `at`
    async fn publish(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatabaseError>;

    /// Delete a post
    async fn delete(&self, id: &str) -> Result<(), DatabaseError>;

    /// Find a post by id
    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, DatabaseError>;

    /// Posts carrying `tag`, newest publication first with unpublished posts ahead
    async fn find_by_tag(
        &self,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DatabaseError>;

    /// Number of posts carrying `tag`
    async fn count_by_tag(&self, tag: &str) -> Result<i64, DatabaseError>;
}

/// Storage operations for accounts
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Store an account; the `id` field is ignored and assigned by storage.
    /// A taken username yields `DatabaseError::DuplicateEntry`.
    async fn insert(&self, account: &Account) -> Result<Account, DatabaseError>;

    /// Find an account by its unique username
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DatabaseError>;
}

/// Order used by tag search: unpublished first, then newest publication first.
pub(crate) fn by_publish_date_desc(a: &Post, b: &Post) -> Ordering {
    match (a.publish_date, b.publish_date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, DatabaseError> {
    lock.read()
        .map_err(|_| DatabaseError::QueryFailed("in-memory store poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, DatabaseError> {
    lock.write()
        .map_err(|_| DatabaseError::QueryFailed("in-memory store poisoned".to_string()))
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// In-memory post repository for testing and development
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<Post, DatabaseError> {
        let stored = Post {
            id: new_id(),
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post.tags.clone(),
            status: PostStatus::Draft,
            publish_date: None,
        };
        write(&self.posts)?.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, post: &NewPost) -> Result<Post, DatabaseError> {
        let mut posts = write(&self.posts)?;
        let existing = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DatabaseError::NotFound)?;
        existing.title = post.title.clone();
        existing.content = post.content.clone();
        existing.tags = post.tags.clone();
        Ok(existing.clone())
    }

    async fn publish(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let mut posts = write(&self.posts)?;
        let existing = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DatabaseError::NotFound)?;
        existing.status = PostStatus::Publish;
        existing.publish_date = Some(at);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let mut posts = write(&self.posts)?;
        let len_before = posts.len();
        posts.retain(|p| p.id != id);
        if posts.len() == len_before {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, DatabaseError> {
        Ok(read(&self.posts)?.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_tag(
        &self,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DatabaseError> {
        let mut matches: Vec<Post> = read(&self.posts)?
            .iter()
            .filter(|p| p.has_tag(tag))
            .cloned()
            .collect();
        matches.sort_by(by_publish_date_desc);

        Ok(matches
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn count_by_tag(&self, tag: &str) -> Result<i64, DatabaseError> {
        let count = read(&self.posts)?.iter().filter(|p| p.has_tag(tag)).count();
        Ok(count as i64)
    }
}

/// In-memory account repository for testing and development
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: &Account) -> Result<Account, DatabaseError> {
        let mut accounts = write(&self.accounts)?;
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(DatabaseError::DuplicateEntry(account.username.clone()));
        }
        let stored = Account {
            id: new_id(),
            ..account.clone()
        };
        accounts.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DatabaseError> {
        Ok(read(&self.accounts)?
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth::Role;
    use chrono::TimeZone;

    fn new_post(title: &str, tags: &[&str]) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: format!("{} content", title),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryPostRepository::new();
        let created = repo.insert(&new_post("First", &["rust"])).await.unwrap();
        assert_eq!(created.status, PostStatus::Draft);
        assert!(created.publish_date.is_none());

        let found = repo.find_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update() {
        let repo = InMemoryPostRepository::new();
        let created = repo.insert(&new_post("First", &["rust"])).await.unwrap();

        let updated = repo
            .update(&created.id, &new_post("Renamed", &["go"]))
            .await
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.tags, vec!["go"]);

        let missing = repo.update("missing", &new_post("x", &[])).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound)));
    }

    #[tokio::test]
    async fn test_publish_and_delete() {
        let repo = InMemoryPostRepository::new();
        let created = repo.insert(&new_post("First", &[])).await.unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();

        repo.publish(&created.id, at).await.unwrap();
        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found.status, PostStatus::Publish);
        assert_eq!(found.publish_date, Some(at));

        repo.delete(&created.id).await.unwrap();
        assert!(matches!(
            repo.delete(&created.id).await,
            Err(DatabaseError::NotFound)
        ));
        assert!(matches!(
            repo.publish(&created.id, at).await,
            Err(DatabaseError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_by_tag_ordering_and_paging() {
        let repo = InMemoryPostRepository::new();
        let old = repo.insert(&new_post("Old", &["rust"])).await.unwrap();
        let new = repo.insert(&new_post("New", &["rust"])).await.unwrap();
        let draft = repo.insert(&new_post("Draft", &["rust"])).await.unwrap();
        repo.insert(&new_post("Other", &["go"])).await.unwrap();

        repo.publish(&old.id, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .await
            .unwrap();
        repo.publish(&new.id, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
            .await
            .unwrap();

        let all = repo.find_by_tag("rust", 50, 0).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![draft.id.as_str(), new.id.as_str(), old.id.as_str()]);

        let second_page = repo.find_by_tag("rust", 2, 2).await.unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].id, old.id);

        assert_eq!(repo.count_by_tag("rust").await.unwrap(), 3);
        assert_eq!(repo.count_by_tag("missing").await.unwrap(), 0);
        assert!(repo.find_by_tag("rust", 10, 10).await.unwrap().is_empty());
        assert!(repo.find_by_tag("rust", 10, i64::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_account_unique_username() {
        let repo = InMemoryAccountRepository::new();
        let account = Account {
            id: String::new(),
            username: "alice".to_string(),
            password_hash: "hash".to_string(),
            name: "Alice".to_string(),
            role: Role::User,
        };

        let stored = repo.insert(&account).await.unwrap();
        assert!(!stored.id.is_empty());
        assert!(matches!(
            repo.insert(&account).await,
            Err(DatabaseError::DuplicateEntry(_))
        ));

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, stored.id);
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }
}

//! Post and account services
//!
//! Business logic called in-process by the HTTP gateway.

use std::sync::Arc;

use auth::{hash_password, verify_password, JwtManager};
use chrono::Utc;
use error::{AppError, AuthError, DatabaseError, Result};

use crate::models::{
    Account, LoginRequest, LoginResponse, NewAccount, NewPost, Pagination, Post, PostPage,
};
use crate::repository::{
    AccountRepository, InMemoryAccountRepository, InMemoryPostRepository, PostRepository,
};

const POST_NOT_FOUND: &str = "post not found";

/// Log a storage failure and turn it into a client-safe error.
fn storage_failure(action: &str, err: DatabaseError) -> AppError {
    tracing::error!(error = %err, "Failed to {}", action);
    AppError::Internal(format!("failed to {} due to a system error", action))
}

/// Map a storage error for an operation on a single post.
fn post_error(action: &str, err: DatabaseError) -> AppError {
    match err {
        DatabaseError::NotFound => AppError::NotFound(POST_NOT_FOUND.to_string()),
        other => storage_failure(action, other),
    }
}

/// Post operations
#[derive(Clone)]
pub struct PostService {
    repository: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(repository: Arc<dyn PostRepository>) -> Self {
        Self { repository }
    }

    /// Post service over an in-memory repository
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryPostRepository::new()))
    }

    /// Create a draft post
    pub async fn create(&self, post: &NewPost) -> Result<Post> {
        let created = self
            .repository
            .insert(post)
            .await
            .map_err(|e| storage_failure("create post", e))?;
        tracing::info!(post_id = %created.id, "Post created");
        Ok(created)
    }

    /// Replace title, content and tags
    pub async fn update(&self, id: &str, post: &NewPost) -> Result<Post> {
        self.repository
            .update(id, post)
            .await
            .map_err(|e| post_error("update post", e))
    }

    /// Publish a post now
    pub async fn publish(&self, id: &str) -> Result<()> {
        self.repository
            .publish(id, Utc::now())
            .await
            .map_err(|e| post_error("publish post", e))?;
        tracing::info!(post_id = %id, "Post published");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| post_error("delete post", e))?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Post> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| storage_failure("fetch post", e))?
            .ok_or_else(|| AppError::NotFound(POST_NOT_FOUND.to_string()))
    }

    /// One page of posts carrying `tag`, with the total match count
    pub async fn search_by_tag(&self, tag: &str, pagination: Pagination) -> Result<PostPage> {
        let data = self
            .repository
            .find_by_tag(tag, i64::from(pagination.limit), pagination.offset())
            .await
            .map_err(|e| storage_failure("search posts", e))?;

        let total = self
            .repository
            .count_by_tag(tag)
            .await
            .map_err(|e| storage_failure("count posts", e))?;

        Ok(PostPage {
            data,
            page: pagination.page,
            page_size: pagination.limit,
            total,
        })
    }
}

impl Default for PostService {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Registration and login
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    jwt: Arc<JwtManager>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>, jwt: Arc<JwtManager>) -> Self {
        Self { repository, jwt }
    }

    /// Account service over an in-memory repository
    pub fn in_memory(jwt: Arc<JwtManager>) -> Self {
        Self::new(Arc::new(InMemoryAccountRepository::new()), jwt)
    }

    /// Register a new account
    pub async fn register(&self, request: &NewAccount) -> Result<Account> {
        if request.username.trim().is_empty() {
            return Err(AppError::Validation("username must not be empty".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_string()));
        }

        let account = Account {
            id: String::new(),
            username: request.username.clone(),
            password_hash: hash_password(&request.password),
            name: request.name.clone(),
            role: request.role,
        };

        let stored = self.repository.insert(&account).await.map_err(|e| match e {
            DatabaseError::DuplicateEntry(_) => {
                AppError::Conflict("username is already taken".to_string())
            }
            other => storage_failure("create account", other),
        })?;

        tracing::info!(account_id = %stored.id, role = %stored.role, "Account registered");
        Ok(stored)
    }

    /// Check credentials and issue a token valid from `now`
    pub async fn login(&self, request: &LoginRequest, now: i64) -> Result<LoginResponse> {
        let account = self
            .repository
            .find_by_username(&request.username)
            .await
            .map_err(|e| storage_failure("log in", e))?;

        let account = match account {
            Some(account) if verify_password(&request.password, &account.password_hash) => account,
            _ => {
                tracing::debug!(username = %request.username, "Login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let token = self.jwt.issue(&account.id, account.role, now)?;
        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(LoginResponse { account, token })
    }
}

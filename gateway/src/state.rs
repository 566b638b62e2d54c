use std::sync::Arc;

use auth::JwtManager;
use db::DbPool;
use post_service::{AccountService, PostService};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub accounts: AccountService,
    pub jwt: Arc<JwtManager>,
    /// Present when backed by PostgreSQL; used by the health check
    pub pool: Option<DbPool>,
}

impl AppState {
    pub fn new(posts: PostService, accounts: AccountService, jwt: Arc<JwtManager>) -> Self {
        Self {
            posts,
            accounts,
            jwt,
            pool: None,
        }
    }

    /// State over in-memory repositories
    pub fn in_memory(jwt: Arc<JwtManager>) -> Self {
        Self::new(
            PostService::in_memory(),
            AccountService::in_memory(jwt.clone()),
            jwt,
        )
    }

    pub fn with_pool(mut self, pool: DbPool) -> Self {
        self.pool = Some(pool);
        self
    }
}

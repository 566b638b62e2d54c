//! Post Service
//!
//! Blog posts and accounts: domain models, storage behind repository traits,
//! and the business operations the HTTP gateway calls in-process.

pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{
    Account, LoginRequest, LoginResponse, NewAccount, NewPost, Pagination, Post, PostPage,
    PostStatus,
};
pub use postgres::{PgAccountRepository, PgPostRepository};
pub use repository::{
    AccountRepository, InMemoryAccountRepository, InMemoryPostRepository, PostRepository,
};
pub use service::{AccountService, PostService};

//! PostgreSQL repositories
//!
//! sqlx-backed implementations of the repository traits. Schema lives in
//! `migrations/001_init.sql`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use db::sqlx::postgres::PgRow;
use db::sqlx::{self, Row};
use db::DbPool;
use error::DatabaseError;

use crate::models::{Account, NewPost, Post, PostStatus};
use crate::repository::{AccountRepository, PostRepository};

const POST_COLUMNS: &str = "id, title, content, tags, status, publish_date";

fn query_failed(e: sqlx::Error) -> DatabaseError {
    tracing::error!("Query failed: {}", e);
    DatabaseError::QueryFailed(e.to_string())
}

fn post_from_row(row: &PgRow) -> Result<Post, sqlx::Error> {
    let status: String = row.try_get("status")?;
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        tags: row.try_get("tags")?,
        status: status.parse::<PostStatus>().map_err(|e| sqlx::Error::Decode(e.into()))?,
        publish_date: row.try_get("publish_date")?,
    })
}

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    let role: String = row.try_get("role")?;
    Ok(Account {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password")?,
        name: row.try_get("name")?,
        role: role.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))?,
    })
}

/// Post repository on a PostgreSQL pool
#[derive(Clone)]
pub struct PgPostRepository {
    pool: DbPool,
}

impl PgPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn insert(&self, post: &NewPost) -> Result<Post, DatabaseError> {
        let row = sqlx::query(&format!(
            "INSERT INTO posts (title, content, tags, status) VALUES ($1, $2, $3, $4) RETURNING {}",
            POST_COLUMNS
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.tags)
        .bind(PostStatus::Draft.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(query_failed)?;

        post_from_row(&row).map_err(query_failed)
    }

    async fn update(&self, id: &str, post: &NewPost) -> Result<Post, DatabaseError> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET title = $1, content = $2, tags = $3 WHERE id = $4 RETURNING {}",
            POST_COLUMNS
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.tags)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?
        .ok_or(DatabaseError::NotFound)?;

        post_from_row(&row).map_err(query_failed)
    }

    async fn publish(&self, id: &str, at: DateTime<Utc>) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE posts SET publish_date = $1, status = $2 WHERE id = $3")
            .bind(at)
            .bind(PostStatus::Publish.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;

        if result.rows_affected() < 1 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, DatabaseError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE id = $1 LIMIT 1",
            POST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.as_ref()
            .map(post_from_row)
            .transpose()
            .map_err(query_failed)
    }

    async fn find_by_tag(
        &self,
        tag: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Post>, DatabaseError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts WHERE $1 = ANY(tags) \
             ORDER BY publish_date DESC NULLS FIRST LIMIT $2 OFFSET $3",
            POST_COLUMNS
        ))
        .bind(tag)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        rows.iter()
            .map(post_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed)
    }

    async fn count_by_tag(&self, tag: &str) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts WHERE $1 = ANY(tags)")
            .bind(tag)
            .fetch_one(&self.pool)
            .await
            .map_err(query_failed)
    }
}

/// Account repository on a PostgreSQL pool
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: DbPool,
}

impl PgAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert(&self, account: &Account) -> Result<Account, DatabaseError> {
        let row = sqlx::query(
            "INSERT INTO accounts (username, password, name, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, username, password, name, role",
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DatabaseError::DuplicateEntry(account.username.clone());
                }
            }
            query_failed(e)
        })?;

        account_from_row(&row).map_err(query_failed)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, DatabaseError> {
        let row = sqlx::query(
            "SELECT id, username, password, name, role FROM accounts WHERE username = $1 LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.as_ref()
            .map(account_from_row)
            .transpose()
            .map_err(query_failed)
    }
}

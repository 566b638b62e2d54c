//! Post endpoints

use auth::Claims;
use axum::extract::{Path, State};
use axum::Extension;
use post_service::{NewPost, Pagination, Post, PostPage};

use crate::extract::{FirstQuery, JsonBody};
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

/// `GET /api/posts?tag=&page=&limit=`. Bad numbers fall back to defaults
/// instead of failing the request.
pub async fn search(
    State(state): State<AppState>,
    query: FirstQuery,
) -> Result<ApiResponse<PostPage>, ApiError> {
    let pagination = Pagination::from_params(query.get("page"), query.get("limit"));
    let tag = query.get("tag").unwrap_or_default();
    let page = state.posts.search_by_tag(tag, pagination).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Post>, ApiError> {
    Ok(ApiResponse::ok(state.posts.get(&id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(post): JsonBody<NewPost>,
) -> Result<ApiResponse<Post>, ApiError> {
    let created = state.posts.create(&post).await?;
    tracing::info!(post_id = %created.id, author = %claims.account_id, "Post created via API");
    Ok(ApiResponse::ok(created))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonBody(post): JsonBody<NewPost>,
) -> Result<ApiResponse<Post>, ApiError> {
    let updated = state.posts.update(&id, &post).await?;
    tracing::info!(post_id = %id, editor = %claims.account_id, "Post updated via API");
    Ok(ApiResponse::ok(updated))
}

pub async fn publish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<String>, ApiError> {
    state.posts.publish(&id).await?;
    Ok(ApiResponse::ok(format!("post {} published", id)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<String>, ApiError> {
    state.posts.delete(&id).await?;
    Ok(ApiResponse::ok(format!("post {} deleted", id)))
}

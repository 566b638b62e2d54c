//! Account endpoints

use auth::current_timestamp;
use axum::extract::State;
use post_service::{Account, LoginRequest, LoginResponse, NewAccount};

use crate::extract::JsonBody;
use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<NewAccount>,
) -> Result<ApiResponse<Account>, ApiError> {
    let account = state.accounts.register(&request).await?;
    Ok(ApiResponse::ok(account))
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, ApiError> {
    let response = state.accounts.login(&request, current_timestamp()).await?;
    Ok(ApiResponse::ok(response))
}

//! Handlers for unscoped inbox items.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use stride_core::types::DbId;
use stride_db::models::item::{CreateItem, UpdateItem};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::InboxListParams;
use crate::response::{DeletedResponse, ItemResponse, ItemsResponse};
use crate::state::AppState;

/// POST /inbox/item
pub async fn create_inbox_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.items.create_inbox_item(auth.user_id, input).await?;
    Ok(Json(ItemResponse { item }))
}

/// GET /inbox/item?type=
pub async fn list_inbox_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InboxListParams>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .items
        .list_inbox_items(auth.user_id, params.item_type.as_deref())
        .await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /inbox/item/overdue
pub async fn list_overdue(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .items
        .list_overdue_inbox_items(auth.user_id, Utc::now())
        .await?;
    Ok(Json(ItemsResponse { items }))
}

/// PUT /inbox/item/{item}
pub async fn update_inbox_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state
        .items
        .update_inbox_item(auth.user_id, id, input)
        .await?;
    Ok(Json(ItemResponse { item }))
}

/// DELETE /inbox/item/{item}
pub async fn delete_inbox_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let item = state.items.delete_inbox_item(auth.user_id, id).await?;
    Ok(Json(DeletedResponse::new(item)))
}

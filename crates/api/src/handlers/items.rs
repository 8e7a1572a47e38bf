//! Handlers for block-scoped items and the cross-scope item queries.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use stride_core::types::DbId;
use stride_db::models::item::{CreateItem, UpdateItem};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{FilterParams, LabelParams, SearchParams};
use crate::response::{DeletedResponse, ItemResponse, ItemsResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Block-scoped items
// ---------------------------------------------------------------------------

/// POST /space/{space}/block/{block}/item
pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((space, block)): Path<(DbId, DbId)>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state
        .items
        .create_item(auth.user_id, input, space, block)
        .await?;
    Ok(Json(ItemResponse { item }))
}

/// GET /space/{space}/block/{block}/item
pub async fn list_block_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((space, block)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .items
        .get_all_items_by_block(auth.user_id, space, block)
        .await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /space/{space}/block/{block}/item/{item}
pub async fn get_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((space, block, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let item = state.items.get_item(auth.user_id, id, space, block).await?;
    Ok(Json(ItemResponse { item }))
}

/// PUT /space/{space}/block/{block}/item/{item}
pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((space, block, id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state
        .items
        .update_item(auth.user_id, id, input, space, block)
        .await?;
    Ok(Json(ItemResponse { item }))
}

/// DELETE /space/{space}/block/{block}/item/{item}
pub async fn delete_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((space, block, id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let item = state
        .items
        .delete_item(id, space, block, auth.user_id)
        .await?;
    Ok(Json(DeletedResponse::new(item)))
}

// ---------------------------------------------------------------------------
// Queries across scopes
// ---------------------------------------------------------------------------

/// GET /item?dueDate=&sort=
pub async fn filter_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .items
        .filter_items(
            auth.user_id,
            params.due_date.as_deref(),
            params.sort.as_deref(),
        )
        .await?;
    Ok(Json(ItemsResponse { items }))
}

/// GET /item/label?space=&name=
///
/// Responds with a bare array, not an `{ items }` envelope.
pub async fn filter_by_label(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LabelParams>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .items
        .get_item_filter_by_label(&params.name, auth.user_id, params.space)
        .await?;
    Ok(Json(items))
}

/// GET /item/search?q=
pub async fn search_items(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let items = state
        .items
        .search_items_by_title(&params.q, auth.user_id)
        .await?;
    tracing::debug!(user_id = auth.user_id, hits = items.len(), "Title search");
    Ok(Json(ItemsResponse { items }))
}

pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route here requires a Bearer token.
///
/// ```text
/// /space/{space}/block/{block}/item[/{item}]   block-scoped item CRUD
/// /item, /item/label, /item/search              queries across scopes
/// /inbox/item[/overdue | /{item}]               inbox CRUD
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(items::block_item_router())
        .merge(items::item_query_router())
        .merge(items::inbox_router())
}

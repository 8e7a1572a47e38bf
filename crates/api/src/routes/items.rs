//! Item route definitions, mounted at the root of `/api/v1`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{inbox, items};
use crate::state::AppState;

/// Block-scoped item routes.
///
/// ```text
/// GET    /space/{space}/block/{block}/item          -> list_block_items
/// POST   /space/{space}/block/{block}/item          -> create_item
/// GET    /space/{space}/block/{block}/item/{item}   -> get_item
/// PUT    /space/{space}/block/{block}/item/{item}   -> update_item
/// DELETE /space/{space}/block/{block}/item/{item}   -> delete_item
/// ```
pub fn block_item_router() -> Router<AppState> {
    Router::new()
        .route(
            "/space/{space}/block/{block}/item",
            get(items::list_block_items).post(items::create_item),
        )
        .route(
            "/space/{space}/block/{block}/item/{item}",
            get(items::get_item)
                .put(items::update_item)
                .delete(items::delete_item),
        )
}

/// Queries across every scope.
///
/// ```text
/// GET /item          -> filter_items (?dueDate, sort)
/// GET /item/label    -> filter_by_label (?space, name)
/// GET /item/search   -> search_items (?q)
/// ```
pub fn item_query_router() -> Router<AppState> {
    Router::new()
        .route("/item", get(items::filter_items))
        .route("/item/label", get(items::filter_by_label))
        .route("/item/search", get(items::search_items))
}

/// Inbox routes.
///
/// ```text
/// GET    /inbox/item           -> list_inbox_items (?type)
/// POST   /inbox/item           -> create_inbox_item
/// GET    /inbox/item/overdue   -> list_overdue
/// PUT    /inbox/item/{item}    -> update_inbox_item
/// DELETE /inbox/item/{item}    -> delete_inbox_item
/// ```
pub fn inbox_router() -> Router<AppState> {
    Router::new()
        .route(
            "/inbox/item",
            get(inbox::list_inbox_items).post(inbox::create_inbox_item),
        )
        .route("/inbox/item/overdue", get(inbox::list_overdue))
        .route(
            "/inbox/item/{item}",
            put(inbox::update_inbox_item).delete(inbox::delete_inbox_item),
        )
}

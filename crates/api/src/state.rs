use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::items::ItemService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the config is behind an `Arc` and the service only holds
/// `Arc`s to its collaborators.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub items: ItemService,
}

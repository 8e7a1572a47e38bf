//! Response envelopes for the item endpoints.
//!
//! Single items come back as `{ "item": ... }`, collections as
//! `{ "items": [...] }` and deletions as `{ "success": true, "data": ... }`.
//! The label filter returns a bare array and uses none of these.

use serde::Serialize;
use stride_db::models::item::Item;

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub item: Item,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<Item>,
}

/// Envelope for a soft delete, carrying the record as it was marked.
#[derive(Debug, Serialize)]
pub struct DeletedResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DeletedResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

//! Item model, DTOs, and listing query.
//!
//! JSON uses the camelCase field names the clients expect (`type`, `space`,
//! `block`, `owner`, `dueDate`, ...); columns stay snake_case.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::items::Placement;
use stride_core::query::{DayRange, ItemSort};
use stride_core::types::{DbId, Timestamp};

/// A row from the `items` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub metadata: serde_json::Value,
    #[serde(rename = "space")]
    pub space_id: Option<DbId>,
    #[serde(rename = "block")]
    pub block_id: Option<DbId>,
    #[serde(rename = "owner")]
    pub owner_id: DbId,
    pub due_date: Option<Timestamp>,
    pub is_completed: bool,
    pub is_archived: bool,
    pub is_deleted: bool,
    pub labels: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Item {
    /// True when the item sits in exactly this placement.
    pub fn is_in(&self, placement: Placement) -> bool {
        self.space_id == placement.space() && self.block_id == placement.block()
    }
}

/// Request body for creating an item.
///
/// Unknown fields are ignored, so clients can post a whole item shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub due_date: Option<Timestamp>,
    pub is_completed: Option<bool>,
    pub labels: Option<Vec<String>>,
}

/// A fully validated item ready to be inserted.
///
/// Built by the service layer from a [`CreateItem`] after typing rules
/// (link previews, defaults, label normalization) have been applied.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner_id: DbId,
    pub placement: Placement,
    pub title: String,
    pub item_type: String,
    pub metadata: serde_json::Value,
    pub due_date: Option<Timestamp>,
    pub is_completed: bool,
    pub labels: Vec<String>,
}

/// Request body for a partial update. `None` leaves the column unchanged.
///
/// Owner and placement are deliberately absent: they never change after
/// creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub item_type: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub due_date: Option<Timestamp>,
    pub is_completed: Option<bool>,
    pub is_archived: Option<bool>,
    pub labels: Option<Vec<String>>,
}

/// Which placements a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScopeFilter {
    /// Inbox and scoped items alike.
    #[default]
    Any,
    /// Only unscoped items.
    Inbox,
    /// Any block within one space.
    Space(DbId),
    /// Exactly one block.
    Block { space: DbId, block: DbId },
}

impl ScopeFilter {
    pub fn matches(&self, item: &Item) -> bool {
        match *self {
            ScopeFilter::Any => true,
            ScopeFilter::Inbox => item.space_id.is_none() && item.block_id.is_none(),
            ScopeFilter::Space(space) => item.space_id == Some(space),
            ScopeFilter::Block { space, block } => {
                item.space_id == Some(space) && item.block_id == Some(block)
            }
        }
    }
}

/// Filters for listing a single owner's items.
///
/// Deleted items are never returned; there is no switch for them.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub owner_id: DbId,
    pub scope: ScopeFilter,
    pub item_type: Option<String>,
    pub label: Option<String>,
    /// Case-insensitive substring of the title, matched literally.
    pub title_contains: Option<String>,
    pub due_within: Option<DayRange>,
    /// Strictly before this instant.
    pub due_before: Option<Timestamp>,
    pub exclude_completed: bool,
    pub sort: ItemSort,
}

impl ItemQuery {
    pub fn for_owner(owner_id: DbId) -> Self {
        Self {
            owner_id,
            ..Self::default()
        }
    }

    /// In-memory equivalent of the SQL `WHERE` clause built by the repo.
    ///
    /// Title matching lowercases both sides where Postgres uses `ILIKE`, so
    /// results can differ for characters whose case folding is not one to
    /// one (e.g. `ß`, dotted/dotless `i`), just as title ordering follows the
    /// database collation there and byte order here.
    pub fn matches(&self, item: &Item) -> bool {
        if item.is_deleted || item.owner_id != self.owner_id || !self.scope.matches(item) {
            return false;
        }
        if self
            .item_type
            .as_deref()
            .is_some_and(|t| item.item_type != t)
        {
            return false;
        }
        if let Some(label) = &self.label {
            if !item.labels.iter().any(|l| l == label) {
                return false;
            }
        }
        if let Some(term) = &self.title_contains {
            if !item.title.to_lowercase().contains(&term.to_lowercase()) {
                return false;
            }
        }
        if let Some(range) = self.due_within {
            if !item.due_date.is_some_and(|d| range.contains(d)) {
                return false;
            }
        }
        if let Some(before) = self.due_before {
            if !item.due_date.is_some_and(|d| d < before) {
                return false;
            }
        }
        !(self.exclude_completed && item.is_completed)
    }
}

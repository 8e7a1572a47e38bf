//! Query string types for the item endpoints.

use serde::Deserialize;
use stride_core::types::DbId;

/// `GET /item?dueDate=&sort=`.
///
/// Both values are raw strings; the service parses them so bad input
/// surfaces as a validation error rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterParams {
    pub due_date: Option<String>,
    pub sort: Option<String>,
}

/// `GET /item/label?space=&name=`.
#[derive(Debug, Deserialize)]
pub struct LabelParams {
    pub space: Option<DbId>,
    pub name: String,
}

/// `GET /item/search?q=`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `GET /inbox/item?type=`.
#[derive(Debug, Default, Deserialize)]
pub struct InboxListParams {
    #[serde(rename = "type")]
    pub item_type: Option<String>,
}

//! Wire types as the client sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type ItemId = i64;

/// Metadata key holding a note body.
pub const NOTE_CONTENT_KEY: &str = "content";

pub const NOTE_TYPE: &str = "note";

/// Credentials for one signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token sent with every request.
    pub token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub space: Option<i64>,
    #[serde(default)]
    pub block: Option<i64>,
    pub owner: i64,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_inbox(&self) -> bool {
        self.space.is_none() && self.block.is_none()
    }
}

/// Body for create and update calls. Unset fields are left out of the JSON,
/// which an update treats as "unchanged".
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl ItemPayload {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn link(url: impl Into<String>) -> Self {
        Self {
            item_type: Some("link".to_string()),
            ..Self::titled(url)
        }
    }
}

/// A note as the editor sees it. Backed by an inbox item of type `note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Id of the backing item.
    pub uuid: ItemId,
    pub title: String,
    /// Rich-text markup.
    pub content: String,
}

impl From<&Item> for Note {
    fn from(item: &Item) -> Self {
        let content = item
            .metadata
            .get(NOTE_CONTENT_KEY)
            .and_then(|c| c.as_str())
            .unwrap_or_default()
            .to_string();
        Self {
            uuid: item.id,
            title: item.title.clone(),
            content,
        }
    }
}

impl Note {
    /// Payload that persists this note's title and body.
    pub fn to_payload(&self) -> ItemPayload {
        ItemPayload {
            title: Some(self.title.clone()),
            item_type: Some(NOTE_TYPE.to_string()),
            metadata: Some(serde_json::json!({ NOTE_CONTENT_KEY: self.content })),
            ..ItemPayload::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ItemEnvelope {
    pub item: Item,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemsEnvelope {
    pub items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeletedEnvelope {
    pub data: Item,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
    pub code: String,
}

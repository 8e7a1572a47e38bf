//! Item rules: types, placement, and input validation.
//!
//! An item either lives in the user's inbox or inside a block of a space.
//! Link items carry their source URL and favicon in `metadata`; note items
//! carry their rich-text body in `metadata.content`.

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of an item title in characters.
pub const MAX_TITLE_LENGTH: usize = 1_000;

/// Maximum number of labels on a single item.
pub const MAX_LABELS: usize = 32;

/// Maximum length of a single label.
pub const MAX_LABEL_LENGTH: usize = 64;

pub const ITEM_TYPE_GENERIC: &str = "generic";
pub const ITEM_TYPE_TASK: &str = "task";
pub const ITEM_TYPE_LINK: &str = "link";
pub const ITEM_TYPE_NOTE: &str = "note";

/// All valid item types.
pub const VALID_ITEM_TYPES: &[&str] = &[
    ITEM_TYPE_GENERIC,
    ITEM_TYPE_TASK,
    ITEM_TYPE_LINK,
    ITEM_TYPE_NOTE,
];

/// Metadata keys written for link items.
pub const METADATA_URL: &str = "url";
pub const METADATA_FAVICON: &str = "favicon";

/// Metadata key holding a note body.
pub const METADATA_CONTENT: &str = "content";

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Where an item lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Unscoped: no space and no block.
    Inbox,
    /// Scoped to a block inside a space.
    Block { space: DbId, block: DbId },
}

impl Placement {
    pub fn space(&self) -> Option<DbId> {
        match self {
            Placement::Inbox => None,
            Placement::Block { space, .. } => Some(*space),
        }
    }

    pub fn block(&self) -> Option<DbId> {
        match self {
            Placement::Inbox => None,
            Placement::Block { block, .. } => Some(*block),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate that the item type is one of the allowed values.
pub fn validate_item_type(item_type: &str) -> Result<(), String> {
    if VALID_ITEM_TYPES.contains(&item_type) {
        Ok(())
    } else {
        Err(format!(
            "Invalid item type '{item_type}'. Must be one of: {}",
            VALID_ITEM_TYPES.join(", ")
        ))
    }
}

/// Validate an item title: non-blank and within the length limit.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Item title must not be empty".to_string());
    }
    validate_title_length(title)
}

/// Title rules for an item of `item_type`. Notes may be untitled.
pub fn validate_title_for_type(item_type: &str, title: &str) -> Result<(), String> {
    if item_type == ITEM_TYPE_NOTE {
        validate_title_length(title)
    } else {
        validate_title(title)
    }
}

fn validate_title_length(title: &str) -> Result<(), String> {
    let len = title.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(format!(
            "Item title is {len} characters, maximum is {MAX_TITLE_LENGTH}"
        ));
    }
    Ok(())
}

/// Validate that item metadata, when given, is a JSON object.
pub fn validate_metadata(metadata: &serde_json::Value) -> Result<(), String> {
    if metadata.is_object() {
        Ok(())
    } else {
        Err("Item metadata must be a JSON object".to_string())
    }
}

/// Normalize a label list: trim, drop blanks, de-duplicate keeping the first
/// occurrence, and enforce the count and length limits.
pub fn normalize_labels(labels: &[String]) -> Result<Vec<String>, String> {
    let mut out: Vec<String> = Vec::with_capacity(labels.len());
    for label in labels {
        let label = label.trim();
        if label.is_empty() {
            continue;
        }
        if label.chars().count() > MAX_LABEL_LENGTH {
            return Err(format!(
                "Label '{label}' exceeds the maximum length of {MAX_LABEL_LENGTH}"
            ));
        }
        if !out.iter().any(|l| l == label) {
            out.push(label.to_string());
        }
    }
    if out.len() > MAX_LABELS {
        return Err(format!(
            "An item may carry at most {MAX_LABELS} labels, got {}",
            out.len()
        ));
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

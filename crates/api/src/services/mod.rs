//! Business logic sitting between the handlers and the item store.

pub mod items;
pub mod link_preview;

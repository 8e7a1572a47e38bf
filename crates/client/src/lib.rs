//! Typed client for the Stride item API and the state stores built on it.
//!
//! - [`api::ApiClient`] -- one method per endpoint.
//! - [`state::StoreState`] -- the cached collection every store wraps.
//! - [`cycle::CycleStore`], [`inbox::InboxStore`], [`notes::NotesStore`] --
//!   the stores views drive.
//!
//! Stores only change their cache after the server confirms a request.

pub mod api;
pub mod cycle;
pub mod error;
pub mod inbox;
pub mod notes;
pub mod state;
pub mod types;

pub use api::ApiClient;
pub use error::ClientError;
pub use types::{Item, ItemId, ItemPayload, Note, Session};

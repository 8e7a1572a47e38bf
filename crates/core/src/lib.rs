//! Domain types, constants and pure helpers shared by the Stride crates.
//!
//! Nothing in here touches the network or the database, so every rule can be
//! unit tested in isolation.

pub mod error;
pub mod items;
pub mod link_preview;
pub mod query;
pub mod types;

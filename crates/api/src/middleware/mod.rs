//! Request extractors shared by the item handlers.

pub mod auth;

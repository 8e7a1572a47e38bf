pub mod inbox;
pub mod items;

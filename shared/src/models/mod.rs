//! Data models
//!
//! Canonical shapes shared by the core and its callers. Remote backends use
//! their own field naming; `pos_core::backend::normalize` maps them onto
//! these types.

pub mod category;
pub mod dining_table;
pub mod ingredient;
pub mod kitchen;
pub mod menu_item;
pub mod order;
pub mod reservation;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use ingredient::*;
pub use kitchen::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;

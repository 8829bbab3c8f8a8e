//! 菜单目录
//!
//! 菜品 → 规格 → 配方。订单定价和送厨扣料都从这里查。

mod catalog;
mod error;
mod service;

pub use catalog::MenuCatalog;
pub use error::MenuError;
pub use service::CatalogService;

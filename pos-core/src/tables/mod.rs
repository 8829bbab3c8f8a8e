//! 桌台模块
//!
//! - [`TableRegistry`] - 桌台登记 (CRUD + 状态)
//! - [`TableService`] - 对外操作入口，负责加锁、日志与事件
//!
//! 状态机:
//!
//! ```text
//! Empty ──开台/入座──▶ Occupied ──结账──▶ Maintenance ──清台──▶ Empty
//! Empty ──预订──▶ Reserved ──到店──▶ Occupied
//!                          └──取消/未到──▶ Empty
//! ```

mod error;
mod registry;
mod service;

pub use error::TableError;
pub use registry::TableRegistry;
pub use service::TableService;

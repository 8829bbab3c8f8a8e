//! 订单生命周期
//!
//! - [`OrderBook`] - 订单存储
//! - 开台 / 改单 / 折扣 / 结账 的同步逻辑实现在 [`crate::core::Store`] 上
//! - [`OrdersManager`] - 对外入口 (加锁、远端追加、日志、事件)
//! - [`money`] - 金额计算 (rust_decimal)

mod book;
mod error;
mod lifecycle;
mod manager;
pub mod money;

pub use book::OrderBook;
pub use error::OrderError;
pub use manager::OrdersManager;

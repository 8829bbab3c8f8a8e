//! 预订模块
//!
//! - [`ReservationBook`] - 预订存储
//! - 预订 / 到店 / 取消 / 未到 的同步逻辑实现在 [`crate::core::Store`] 上
//! - [`ReservationManager`] - 对外入口，先调用远端再写本地
//! - [`availability`] - 可用桌台查询

pub mod availability;
mod book;
mod error;
mod lifecycle;
mod manager;

pub use book::ReservationBook;
pub use error::ReservationError;
pub use lifecycle::{PreparedReservation, Transition};
pub use manager::ReservationManager;

//! 送厨 (KDS)
//!
//! 送厨时对订单拍快照生成厨房单，并按配方扣减库存。这是唯一的扣料入口。

mod dispatch;
mod error;
mod queue;

pub use dispatch::{Dispatch, KitchenDispatcher};
pub use error::KitchenError;
pub use queue::KitchenQueue;

//! 快照持久化
//!
//! 整体快照写入 redb：桌台、订单、菜单、分类、预订、厨房单、库存流水。
//! 原料库存不落盘，启动时总是从后端重新拉取。

mod snapshot;
mod worker;

pub use snapshot::{PersistedState, SnapshotStore, StorageError, StorageResult};
pub use worker::SnapshotWorker;

//! 核心模块 - 配置、共享模型、状态容器、事件和后台任务
//!
//! # 模块结构
//!
//! - [`Config`] - 配置
//! - [`Store`] - 内存模型 (桌台、订单、菜单、预订、库存、厨房单)
//! - [`PosState`] - 持有 Store、后端和各服务
//! - [`PosEvent`] - 状态变化事件
//! - [`BackgroundTasks`] - 后台任务 (快照 worker)

pub mod config;
pub mod events;
pub mod state;
pub mod store;
pub mod tasks;

pub use config::Config;
pub use events::{EventBus, PosEvent};
pub use state::PosState;
pub use store::{SharedStore, Store};
pub use tasks::{BackgroundTasks, TaskOutcome};

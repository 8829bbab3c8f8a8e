//! Restaurant POS core - 餐桌、订单、预订与库存
//!
//! # 架构概述
//!
//! 本 crate 维护餐桌占用状态、当前订单、预订的桌台分配以及配料库存之间的一致性。
//! 所有组件共享一个内存模型 ([`core::Store`])，由 [`core::PosState`] 持有。
//!
//! # 模块结构
//!
//! ```text
//! pos-core/src/
//! ├── core/          # 配置、状态容器、事件、后台任务
//! ├── tables/        # 桌台登记与状态机
//! ├── orders/        # 订单生命周期与金额计算
//! ├── menu/          # 菜单目录 (尺寸 + 配方)
//! ├── reservations/  # 预订与可用桌台查询
//! ├── inventory/     # 库存台账 (IN / ADJUST / CONSUME)
//! ├── kitchen/       # 送厨队列
//! ├── backend/       # 远端接口 (HTTP / 内存) 与字段归一化
//! ├── persistence/   # redb 快照
//! └── utils/         # 日志
//! ```

pub mod backend;
pub mod core;
pub mod inventory;
pub mod kitchen;
pub mod menu;
pub mod orders;
pub mod persistence;
pub mod reservations;
pub mod tables;
pub mod utils;

// Re-export 公共类型
pub use backend::{BackendError, BookingBackend, CatalogBackend, HttpBackend, MemoryBackend};
pub use core::{Config, PosEvent, PosState, Store};
pub use inventory::{InventoryError, OverconsumptionPolicy};
pub use kitchen::KitchenError;
pub use orders::OrderError;
pub use persistence::{SnapshotStore, StorageError};
pub use reservations::ReservationError;
pub use tables::TableError;

// Re-export unified error types from shared
pub use shared::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: 加载 .env，读取配置，确保目录存在，初始化日志
pub fn setup_environment() -> std::io::Result<Config> {
    // .env 可选
    dotenv::dotenv().ok();
    let config = Config::from_env();

    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}

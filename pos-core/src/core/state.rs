use super::tasks::{BackgroundTasks, TaskOutcome};
use super::{Config, EventBus, PosEvent, SharedStore, Store};
use crate::backend::{BookingBackend, CatalogBackend};
use crate::inventory::InventoryService;
use crate::kitchen::KitchenDispatcher;
use crate::menu::CatalogService;
use crate::orders::OrdersManager;
use crate::persistence::{SnapshotStore, SnapshotWorker, StorageResult};
use crate::reservations::ReservationManager;
use crate::tables::TableService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const SNAPSHOT_TASK: &str = "snapshot_worker";

/// POS 状态 - 持有共享模型和所有服务
///
/// 所有服务共享同一个 [`SharedStore`] 和 [`EventBus`]，Clone 成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置 (不可变) |
/// | store | 内存模型 |
/// | events | 事件广播 |
/// | snapshots | 快照存储，None 时不落盘 |
/// | tables | 桌台 CRUD 与状态 |
/// | orders | 订单生命周期 |
/// | reservations | 预订与可用桌台 |
/// | inventory | 库存台账 |
/// | kitchen | 送厨调度 |
/// | catalog | 菜单 |
///
/// ```ignore
/// let state = PosState::initialize(&config, booking, catalog).await?;
/// let order = state.orders.create_order("T1", items)?;
/// state.kitchen.send_order_to_kitchen(&order.id).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PosState {
    pub config: Config,
    pub store: SharedStore,
    pub events: EventBus,
    pub snapshots: Option<SnapshotStore>,
    pub tables: TableService,
    pub orders: OrdersManager,
    pub reservations: ReservationManager,
    pub inventory: InventoryService,
    pub kitchen: KitchenDispatcher,
    pub catalog: CatalogService,
}

impl PosState {
    /// 手动构造，不做任何 IO
    pub fn new(
        config: Config,
        store: Store,
        booking: Arc<dyn BookingBackend>,
        catalog: Arc<dyn CatalogBackend>,
        snapshots: Option<SnapshotStore>,
    ) -> Self {
        let store = store.into_shared();
        let events = EventBus::new();
        let inventory = InventoryService::new(store.clone(), catalog.clone(), events.clone());

        Self {
            tables: TableService::new(store.clone(), events.clone()),
            orders: OrdersManager::new(store.clone(), booking.clone(), events.clone()),
            reservations: ReservationManager::new(
                store.clone(),
                booking,
                events.clone(),
                config.reservation_slot_millis(),
            ),
            kitchen: KitchenDispatcher::new(
                store.clone(),
                catalog.clone(),
                inventory.clone(),
                events.clone(),
                config.overconsumption_policy,
            ),
            catalog: CatalogService::new(store.clone(), catalog),
            inventory,
            config,
            store,
            events,
            snapshots,
        }
    }

    /// 初始化
    ///
    /// 按顺序：
    /// 1. 打开快照数据库 (work_dir/pos-snapshot.redb) 并恢复
    /// 2. 从菜单后端刷新分类和菜品 (失败则沿用快照)
    /// 3. 从库存后端加载原料 (失败则为空)
    pub async fn initialize(
        config: &Config,
        booking: Arc<dyn BookingBackend>,
        catalog: Arc<dyn CatalogBackend>,
    ) -> StorageResult<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let snapshots = SnapshotStore::open(config.snapshot_path())?;
        let persisted = snapshots.load()?;
        if persisted.is_empty() {
            tracing::info!("No snapshot found, starting empty");
        } else {
            tracing::info!(
                saved_at = ?persisted.saved_at,
                tables = persisted.tables.len(),
                orders = persisted.orders.len(),
                reservations = persisted.reservations.len(),
                "Snapshot restored"
            );
        }

        let state = Self::new(
            config.clone(),
            Store::from_persisted(persisted),
            booking,
            catalog,
            Some(snapshots),
        );
        state.hydrate().await;
        Ok(state)
    }

    /// Pull menu and ingredients from the catalog backend
    pub async fn hydrate(&self) {
        let menu_ok = self.catalog.refresh().await;
        let stock_ok = self.inventory.refresh_ingredients().await;
        if !(menu_ok && stock_ok) {
            tracing::warn!(menu_ok, stock_ok, "Started with partial catalog data");
        }
    }

    /// 启动后台任务 (快照 worker)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();
        if let Some(snapshots) = &self.snapshots {
            let worker = SnapshotWorker::new(
                self.store.clone(),
                snapshots.clone(),
                Duration::from_secs(self.config.snapshot_interval_secs),
            );
            let token = tasks.shutdown_token();
            tasks.spawn(SNAPSHOT_TASK, worker.run(token));
        }
        tracing::info!(count = tasks.len(), "Background tasks started");
        tasks
    }

    /// Write a snapshot now; no-op without a snapshot store
    pub fn save_snapshot(&self) -> StorageResult<()> {
        match &self.snapshots {
            Some(snapshots) => {
                SnapshotWorker::new(self.store.clone(), snapshots.clone(), Duration::ZERO).save_now()
            }
            None => Ok(()),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PosEvent> {
        self.events.subscribe()
    }

    /// Graceful shutdown. The snapshot worker writes the final snapshot on
    /// its way out; when it is missing or did not stop cleanly the snapshot
    /// is written here instead.
    pub async fn shutdown(&self, tasks: BackgroundTasks) {
        let report = tasks.shutdown().await;
        let worker_saved = report
            .iter()
            .any(|(name, outcome)| *name == SNAPSHOT_TASK && *outcome == TaskOutcome::Stopped);
        if !worker_saved {
            if let Err(e) = self.save_snapshot() {
                tracing::error!(error = %e, "Final snapshot failed");
            }
        }
        tracing::info!("POS core stopped");
    }
}

//! 共享内存模型
//!
//! 每个组件的同步逻辑都以 `impl Store` 的形式写在各自模块里，这样一次写锁
//! 内就能完成跨组件的校验和修改 (例如开台同时检查桌台与订单)。

use crate::inventory::InventoryLedger;
use crate::kitchen::KitchenQueue;
use crate::menu::MenuCatalog;
use crate::orders::OrderBook;
use crate::persistence::PersistedState;
use crate::reservations::ReservationBook;
use crate::tables::TableRegistry;
use parking_lot::RwLock;
use std::sync::Arc;

/// Process-wide handle to the model. Never hold a guard across `.await`.
pub type SharedStore = Arc<RwLock<Store>>;

#[derive(Debug, Clone, Default)]
pub struct Store {
    pub tables: TableRegistry,
    pub orders: OrderBook,
    pub menu: MenuCatalog,
    pub reservations: ReservationBook,
    pub inventory: InventoryLedger,
    pub kitchen: KitchenQueue,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Rebuild from a snapshot. Ingredients are left empty and must be
    /// hydrated from the catalog backend.
    pub fn from_persisted(state: PersistedState) -> Self {
        let mut menu = MenuCatalog::new();
        menu.replace_items(state.menu_items);
        menu.replace_categories(state.categories);

        let mut inventory = InventoryLedger::new();
        inventory.restore_transactions(state.transactions);

        Self {
            tables: TableRegistry::from_tables(state.tables),
            orders: OrderBook::from_orders(state.orders),
            menu,
            reservations: ReservationBook::from_reservations(state.reservations),
            inventory,
            kitchen: KitchenQueue::from_tickets(state.kitchen_tickets),
        }
    }

    pub fn to_persisted(&self, now: i64) -> PersistedState {
        PersistedState {
            tables: self.tables.snapshot(),
            orders: self.orders.snapshot(),
            menu_items: self.menu.snapshot_items(),
            categories: self.menu.categories().to_vec(),
            reservations: self.reservations.snapshot(),
            kitchen_tickets: self.kitchen.list(),
            transactions: self.inventory.transactions().to_vec(),
            saved_at: Some(now),
        }
    }
}

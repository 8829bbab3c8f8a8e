use super::TableError;
use crate::core::events::EventBus;
use crate::core::store::{SharedStore, Store};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, Order, TableStatus};

impl Store {
    /// The order a table points at, unless it has been closed
    pub fn active_order(&self, table_id: &str) -> Option<&Order> {
        let order_id = self.tables.get(table_id)?.order_id.as_deref()?;
        self.orders.get(order_id).filter(|o| !o.is_closed())
    }

    pub fn remove_table(&mut self, table_id: &str) -> Result<DiningTable, TableError> {
        if !self.tables.contains(table_id) {
            return Err(TableError::NotFound(table_id.to_string()));
        }
        if let Some(order) = self.active_order(table_id) {
            return Err(TableError::HasOpenOrder {
                table_id: table_id.to_string(),
                order_id: order.id.clone(),
            });
        }
        self.tables
            .remove(table_id)
            .ok_or_else(|| TableError::NotFound(table_id.to_string()))
    }

    /// 清台: back to Empty, refused while an open order is attached
    pub fn reset_table(&mut self, table_id: &str) -> Result<DiningTable, TableError> {
        if !self.tables.contains(table_id) {
            return Err(TableError::NotFound(table_id.to_string()));
        }
        if let Some(order) = self.active_order(table_id) {
            return Err(TableError::HasOpenOrder {
                table_id: table_id.to_string(),
                order_id: order.id.clone(),
            });
        }
        self.tables.set_status(table_id, TableStatus::Empty)
    }
}

/// 桌台服务
#[derive(Debug, Clone)]
pub struct TableService {
    store: SharedStore,
    events: EventBus,
}

impl TableService {
    pub fn new(store: SharedStore, events: EventBus) -> Self {
        Self { store, events }
    }

    pub fn add_table(&self, data: DiningTableCreate) -> Result<DiningTable, TableError> {
        let table = self.store.write().tables.insert(data)?;
        tracing::info!(table_id = %table.id, capacity = table.capacity, "Table added");
        Ok(table)
    }

    pub fn update_table(&self, id: &str, data: DiningTableUpdate) -> Result<DiningTable, TableError> {
        let table = self.store.write().tables.update(id, data)?;
        tracing::info!(table_id = %id, "Table updated");
        Ok(table)
    }

    pub fn remove_table(&self, id: &str) -> Result<DiningTable, TableError> {
        let table = self.store.write().remove_table(id)?;
        tracing::info!(table_id = %id, "Table removed");
        Ok(table)
    }

    pub fn get_table(&self, id: &str) -> Option<DiningTable> {
        self.store.read().tables.get(id).cloned()
    }

    pub fn list_tables(&self) -> Vec<DiningTable> {
        self.store.read().tables.list()
    }

    pub fn tables_in_zone(&self, zone_id: &str) -> Vec<DiningTable> {
        self.store.read().tables.in_zone(zone_id)
    }

    /// Direct staff override, no checks against open orders
    pub fn set_status(&self, id: &str, status: TableStatus) -> Result<DiningTable, TableError> {
        let table = self.store.write().tables.set_status(id, status)?;
        tracing::info!(table_id = %id, status = ?status, "Table status overridden");
        self.events.table_changed(&table);
        Ok(table)
    }

    pub fn get_active_order(&self, table_id: &str) -> Option<Order> {
        self.store.read().active_order(table_id).cloned()
    }

    pub fn reset_table(&self, id: &str) -> Result<DiningTable, TableError> {
        let table = self.store.write().reset_table(id)?;
        tracing::info!(table_id = %id, "Table reset");
        self.events.table_changed(&table);
        Ok(table)
    }
}

//! OrdersManager - 订单操作入口
//!
//! ```text
//! create / update / discount / close
//!     ├─ 1. write lock
//!     ├─ 2. Store 校验 + 修改
//!     ├─ 3. release lock
//!     └─ 4. log + broadcast
//!
//! add_items_to_existing_order
//!     ├─ 1. read lock: resolve active order, validate items
//!     ├─ 2. remote append + fetch (no lock held)
//!     └─ 3. write lock: reconcile items, recompute totals
//! ```

use super::{OrderError, money};
use crate::backend::BookingBackend;
use crate::core::events::{EventBus, PosEvent};
use crate::core::store::SharedStore;
use shared::models::{Order, OrderItem};
use shared::util::now_millis;
use std::sync::Arc;

/// 订单管理器
#[derive(Clone)]
pub struct OrdersManager {
    store: SharedStore,
    booking: Arc<dyn BookingBackend>,
    events: EventBus,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("store", &"<SharedStore>")
            .field("booking", &"<dyn BookingBackend>")
            .finish()
    }
}

impl OrdersManager {
    pub fn new(store: SharedStore, booking: Arc<dyn BookingBackend>, events: EventBus) -> Self {
        Self {
            store,
            booking,
            events,
        }
    }

    pub fn create_order(&self, table_id: &str, items: Vec<OrderItem>) -> Result<Order, OrderError> {
        let (order, table) = {
            let mut store = self.store.write();
            let order = store.create_order(table_id, items, now_millis())?;
            let table = store.tables.get(table_id).cloned();
            (order, table)
        };

        tracing::info!(
            order_id = %order.id,
            table_id = %table_id,
            items = order.items.len(),
            total = order.total,
            "Order created"
        );
        if let Some(table) = table {
            self.events.table_changed(&table);
        }
        self.events.publish(PosEvent::OrderCreated(order.clone()));
        Ok(order)
    }

    /// `Ok(None)` when the order does not exist
    pub fn update_order(&self, order_id: &str, items: Vec<OrderItem>) -> Result<Option<Order>, OrderError> {
        let updated = self.store.write().update_order(order_id, items)?;
        match &updated {
            Some(order) => {
                tracing::info!(order_id = %order_id, items = order.items.len(), total = order.total, "Order items replaced");
                self.events.publish(PosEvent::OrderUpdated(order.clone()));
            }
            None => tracing::debug!(order_id = %order_id, "Update skipped, order not found"),
        }
        Ok(updated)
    }

    pub fn set_discount(&self, order_id: &str, percent: f64) -> Result<Order, OrderError> {
        let order = self.store.write().set_discount(order_id, percent)?;
        tracing::info!(order_id = %order_id, discount = percent, total = order.total, "Discount applied");
        self.events.publish(PosEvent::OrderUpdated(order.clone()));
        Ok(order)
    }

    /// Append items through the booking backend, then adopt its full view of the order
    pub async fn add_items_to_existing_order(
        &self,
        table_id: &str,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderError> {
        let order = {
            let store = self.store.read();
            if !store.tables.contains(table_id) {
                return Err(OrderError::TableNotFound(table_id.to_string()));
            }
            let order = store
                .active_order(table_id)
                .cloned()
                .ok_or_else(|| OrderError::NoActiveOrder(table_id.to_string()))?;
            money::validate_items(&items, &store.menu)?;
            order
        };

        if let Err(e) = self.booking.append_order_items(&order, &items).await {
            tracing::error!(order_id = %order.id, error = %e, "Remote append failed, local order unchanged");
            return Err(e.into());
        }
        let fetched = match self.booking.fetch_order(&order.id).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::error!(order_id = %order.id, error = %e, "Refetch after append failed, local order unchanged");
                return Err(e.into());
            }
        };

        let updated = self
            .store
            .write()
            .reconcile_order_items(&order.id, fetched.items)?;
        tracing::info!(
            order_id = %updated.id,
            added = items.len(),
            items = updated.items.len(),
            total = updated.total,
            "Items appended to order"
        );
        self.events.publish(PosEvent::OrderUpdated(updated.clone()));
        Ok(updated)
    }

    pub fn close_order(&self, order_id: &str, payment_method: &str) -> Result<Order, OrderError> {
        let (order, table) = {
            let mut store = self.store.write();
            let order = store.close_order(order_id, payment_method, now_millis())?;
            let table = store.tables.get(&order.table_id).cloned();
            (order, table)
        };

        tracing::info!(
            order_id = %order.id,
            table_id = %order.table_id,
            payment_method = %payment_method.trim(),
            total = order.total,
            "Order closed"
        );
        if let Some(table) = table {
            self.events.table_changed(&table);
        }
        self.events.publish(PosEvent::OrderClosed(order.clone()));
        Ok(order)
    }

    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.store.read().orders.get(order_id).cloned()
    }

    pub fn list_open_orders(&self) -> Vec<Order> {
        self.store.read().orders.open_orders()
    }
}

//! 订单状态变更 (同步、纯内存)
//!
//! Every method validates first and mutates only once all checks pass.

use super::{OrderBook, OrderError, money};
use crate::core::store::Store;
use crate::menu::MenuCatalog;
use shared::models::{Order, OrderItem};

impl Store {
    /// 开台: one open order per table
    pub fn create_order(
        &mut self,
        table_id: &str,
        items: Vec<OrderItem>,
        now: i64,
    ) -> Result<Order, OrderError> {
        if !self.tables.contains(table_id) {
            return Err(OrderError::TableNotFound(table_id.to_string()));
        }
        if let Some(existing) = self.active_order(table_id) {
            return Err(OrderError::TableOccupied {
                table_id: table_id.to_string(),
                order_id: existing.id.clone(),
            });
        }
        money::validate_items(&items, &self.menu)?;

        let mut order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            table_id: table_id.to_string(),
            items,
            subtotal: 0.0,
            total: 0.0,
            discount_percent: 0.0,
            created_at: now,
            closed_at: None,
            payment_method: None,
        };
        money::recalculate_totals(&mut order, &self.menu)?;

        self.tables
            .occupy(table_id, &order.id)
            .map_err(|_| OrderError::TableNotFound(table_id.to_string()))?;
        self.orders.insert(order.clone());
        Ok(order)
    }

    /// Replace the item list. `None` when the order does not exist.
    pub fn update_order(
        &mut self,
        order_id: &str,
        items: Vec<OrderItem>,
    ) -> Result<Option<Order>, OrderError> {
        let Some(order) = self.orders.get(order_id) else {
            return Ok(None);
        };
        if order.is_closed() {
            return Err(OrderError::AlreadyClosed(order_id.to_string()));
        }
        money::validate_items(&items, &self.menu)?;

        let Some(order) = self.orders.get_mut(order_id) else {
            return Ok(None);
        };
        let updated = repriced(order, &self.menu, |o| o.items = items)?;
        *order = updated.clone();
        Ok(Some(updated))
    }

    pub fn set_discount(&mut self, order_id: &str, percent: f64) -> Result<Order, OrderError> {
        money::validate_discount(percent)?;
        let order = open_order_mut(&mut self.orders, order_id)?;
        let updated = repriced(order, &self.menu, |o| o.discount_percent = percent)?;
        *order = updated.clone();
        Ok(updated)
    }

    /// Overwrite items with the backend's view of the order
    pub(crate) fn reconcile_order_items(
        &mut self,
        order_id: &str,
        items: Vec<OrderItem>,
    ) -> Result<Order, OrderError> {
        let order = open_order_mut(&mut self.orders, order_id)?;
        let updated = repriced(order, &self.menu, |o| o.items = items)?;
        *order = updated.clone();
        Ok(updated)
    }

    /// 结账: table goes to cleanup keeping the order reference
    pub fn close_order(
        &mut self,
        order_id: &str,
        payment_method: &str,
        now: i64,
    ) -> Result<Order, OrderError> {
        let payment_method = payment_method.trim();
        if payment_method.is_empty() {
            return Err(OrderError::MissingPaymentMethod);
        }
        let order = open_order_mut(&mut self.orders, order_id)?;
        order.closed_at = Some(now);
        order.payment_method = Some(payment_method.to_string());
        let order = order.clone();

        if self.tables.release(&order.table_id, &order.id).is_none() {
            tracing::warn!(order_id = %order.id, table_id = %order.table_id, "Closed order's table no longer exists");
        }
        Ok(order)
    }
}

/// Apply `edit` to a copy and recompute its totals
fn repriced(order: &Order, menu: &MenuCatalog, edit: impl FnOnce(&mut Order)) -> Result<Order, OrderError> {
    let mut updated = order.clone();
    edit(&mut updated);
    money::recalculate_totals(&mut updated, menu)?;
    Ok(updated)
}

fn open_order_mut<'a>(orders: &'a mut OrderBook, order_id: &str) -> Result<&'a mut Order, OrderError> {
    let order = orders
        .get_mut(order_id)
        .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
    if order.is_closed() {
        return Err(OrderError::AlreadyClosed(order_id.to_string()));
    }
    Ok(order)
}

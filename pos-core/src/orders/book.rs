use shared::models::Order;
use std::collections::HashMap;

/// 订单存储 (open and closed)
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    orders: HashMap<String, Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_orders(orders: Vec<Order>) -> Self {
        Self {
            orders: orders.into_iter().map(|o| (o.id.clone(), o)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Order> {
        self.orders.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Order> {
        self.orders.get_mut(id)
    }

    pub(crate) fn insert(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Non-closed orders, oldest first
    pub fn open_orders(&self) -> Vec<Order> {
        let mut open: Vec<Order> = self
            .orders
            .values()
            .filter(|o| !o.is_closed())
            .cloned()
            .collect();
        open.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        open
    }

    pub fn snapshot(&self) -> Vec<Order> {
        self.orders.values().cloned().collect()
    }
}

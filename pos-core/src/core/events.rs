//! POS 事件广播
//!
//! UI 或其它协作方通过 [`EventBus::subscribe`] 接收状态变化。没有订阅者时事件直接丢弃。

use serde::Serialize;
use shared::models::{InventoryTransaction, KitchenTicket, Order, Reservation, TableStatus};
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// 状态变化事件
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PosEvent {
    TableStatusChanged {
        table_id: String,
        status: TableStatus,
        order_id: Option<String>,
    },
    OrderCreated(Order),
    OrderUpdated(Order),
    OrderClosed(Order),
    ReservationChanged(Reservation),
    TicketQueued(KitchenTicket),
    TicketAdvanced(KitchenTicket),
    StockChanged(InventoryTransaction),
    LowStock { ingredient_ids: Vec<String> },
}

impl PosEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PosEvent::TableStatusChanged { .. } => "table_status_changed",
            PosEvent::OrderCreated(_) => "order_created",
            PosEvent::OrderUpdated(_) => "order_updated",
            PosEvent::OrderClosed(_) => "order_closed",
            PosEvent::ReservationChanged(_) => "reservation_changed",
            PosEvent::TicketQueued(_) => "ticket_queued",
            PosEvent::TicketAdvanced(_) => "ticket_advanced",
            PosEvent::StockChanged(_) => "stock_changed",
            PosEvent::LowStock { .. } => "low_stock",
        }
    }
}

/// 事件总线 (broadcast sender 的轻量包装)
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PosEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// 订阅事件流
    pub fn subscribe(&self) -> broadcast::Receiver<PosEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: PosEvent) {
        let name = event.name();
        if self.tx.send(event).is_err() {
            tracing::trace!(event = name, "No subscribers, event dropped");
        }
    }

    /// Publish a table status change
    pub fn table_changed(&self, table: &shared::models::DiningTable) {
        self.publish(PosEvent::TableStatusChanged {
            table_id: table.id.clone(),
            status: table.status,
            order_id: table.order_id.clone(),
        });
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

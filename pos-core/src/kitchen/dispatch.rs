use super::KitchenError;
use crate::backend::CatalogBackend;
use crate::core::events::{EventBus, PosEvent};
use crate::core::store::{SharedStore, Store};
use crate::inventory::{InventoryService, OverconsumptionPolicy};
use crate::inventory::newly_low;
use shared::models::{InventoryTransaction, KitchenTicket, KitchenTicketItem, KitchenTicketStatus};
use shared::util::{now_millis, prefixed_id};
use std::sync::Arc;

/// Result of sending one order to the kitchen
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub ticket: KitchenTicket,
    pub consumption: InventoryTransaction,
    /// Ingredients that crossed their minimum during this dispatch
    pub newly_low: Vec<String>,
}

impl Store {
    /// 送厨: snapshot the order into a ticket and consume its recipes.
    ///
    /// `Ok(None)` when the order does not exist. Each call is a separate
    /// dispatch: sending the same order again queues another ticket and
    /// consumes every item again (no tracking of already-sent lines).
    pub fn dispatch_order(
        &mut self,
        order_id: &str,
        policy: OverconsumptionPolicy,
        now: i64,
    ) -> Result<Option<Dispatch>, KitchenError> {
        let Some(order) = self.orders.get(order_id) else {
            return Ok(None);
        };
        if order.is_closed() {
            return Err(KitchenError::OrderClosed(order_id.to_string()));
        }
        if order.items.is_empty() {
            return Err(KitchenError::EmptyOrder(order_id.to_string()));
        }

        let table_name = self
            .tables
            .get(&order.table_id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| order.table_id.clone());
        let items: Vec<KitchenTicketItem> = order
            .items
            .iter()
            .map(|item| KitchenTicketItem {
                item_name: self
                    .menu
                    .get(&item.menu_item_id)
                    .map(|m| m.name.clone())
                    .unwrap_or_else(|| item.menu_item_id.clone()),
                size_name: item.size_name.clone(),
                quantity: item.quantity,
                notes: item.notes.clone(),
            })
            .collect();
        let order_items = order.items.clone();

        // 扣料失败 (reject 策略) 时不入队
        let before = self.inventory.low_stock_ids();
        let consumption = self.inventory.consume_by_order_items(
            &order_items,
            &self.menu,
            policy,
            Some(order_id),
            now,
        )?;
        let newly_low = newly_low(&before, self.inventory.low_stock_ids());

        let ticket = KitchenTicket {
            id: prefixed_id("kds"),
            order_id: order_id.to_string(),
            table_name,
            items,
            created_at: now,
            status: KitchenTicketStatus::Queued,
        };
        self.kitchen.push_front(ticket.clone());

        Ok(Some(Dispatch {
            ticket,
            consumption,
            newly_low,
        }))
    }
}

/// 送厨调度
#[derive(Clone)]
pub struct KitchenDispatcher {
    store: SharedStore,
    catalog: Arc<dyn CatalogBackend>,
    inventory: InventoryService,
    events: EventBus,
    policy: OverconsumptionPolicy,
}

impl std::fmt::Debug for KitchenDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenDispatcher")
            .field("store", &"<SharedStore>")
            .field("catalog", &"<dyn CatalogBackend>")
            .field("policy", &self.policy)
            .finish()
    }
}

impl KitchenDispatcher {
    pub fn new(
        store: SharedStore,
        catalog: Arc<dyn CatalogBackend>,
        inventory: InventoryService,
        events: EventBus,
        policy: OverconsumptionPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            inventory,
            events,
            policy,
        }
    }

    /// Queue a ticket for the order and deduct its ingredients.
    ///
    /// Re-sending an order deducts its full recipe again; see
    /// [`Store::dispatch_order`].
    ///
    /// The CONSUME transaction is pushed to the catalog backend afterwards;
    /// a failed push is logged and does not undo the local deduction.
    pub async fn send_order_to_kitchen(&self, order_id: &str) -> Result<Option<KitchenTicket>, KitchenError> {
        let dispatched = self
            .store
            .write()
            .dispatch_order(order_id, self.policy, now_millis())?;
        let Some(Dispatch {
            ticket,
            consumption,
            newly_low,
        }) = dispatched
        else {
            tracing::debug!(order_id = %order_id, "Send to kitchen skipped, order not found");
            return Ok(None);
        };

        tracing::info!(
            order_id = %order_id,
            ticket_id = %ticket.id,
            table = %ticket.table_name,
            items = ticket.items.len(),
            "Order sent to kitchen"
        );
        self.events.publish(PosEvent::TicketQueued(ticket.clone()));
        self.events.publish(PosEvent::StockChanged(consumption.clone()));
        self.inventory.report_low_stock(newly_low);

        if let Err(e) = self.catalog.push_transaction(&consumption).await {
            tracing::warn!(tx_id = %consumption.id, order_id = %order_id, error = %e, "Consumption not pushed to backend, local stock already deducted");
        }
        Ok(Some(ticket))
    }

    pub fn advance_ticket(&self, ticket_id: &str) -> Result<KitchenTicket, KitchenError> {
        let ticket = self.store.write().kitchen.advance(ticket_id)?;
        tracing::info!(ticket_id = %ticket_id, status = ?ticket.status, "Kitchen ticket advanced");
        self.events.publish(PosEvent::TicketAdvanced(ticket.clone()));
        Ok(ticket)
    }

    /// Most recent first
    pub fn kitchen_queue(&self) -> Vec<KitchenTicket> {
        self.store.read().kitchen.list()
    }
}

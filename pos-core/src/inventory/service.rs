//! 库存服务
//!
//! IN / ADJUST 先推送远端，成功后再写本地；远端失败则本地不变。

use super::InventoryError;
use crate::backend::CatalogBackend;
use crate::core::events::{EventBus, PosEvent};
use crate::core::store::SharedStore;
use shared::models::{Ingredient, InventoryTransaction, StockDelta};
use shared::util::now_millis;
use std::sync::Arc;

#[derive(Clone)]
pub struct InventoryService {
    store: SharedStore,
    catalog: Arc<dyn CatalogBackend>,
    events: EventBus,
}

impl std::fmt::Debug for InventoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryService")
            .field("store", &"<SharedStore>")
            .field("catalog", &"<dyn CatalogBackend>")
            .finish()
    }
}

impl InventoryService {
    pub fn new(store: SharedStore, catalog: Arc<dyn CatalogBackend>, events: EventBus) -> Self {
        Self {
            store,
            catalog,
            events,
        }
    }

    /// 入库
    pub async fn record_inventory_in(
        &self,
        items: Vec<StockDelta>,
        supplier_id: Option<String>,
        note: Option<String>,
    ) -> Result<InventoryTransaction, InventoryError> {
        let tx = self
            .store
            .read()
            .inventory
            .prepare_in(&items, supplier_id, note, now_millis())?;
        self.push_then_commit(tx).await
    }

    /// 盘点调整
    pub async fn adjust_inventory(
        &self,
        items: Vec<StockDelta>,
        note: Option<String>,
    ) -> Result<InventoryTransaction, InventoryError> {
        let tx = self
            .store
            .read()
            .inventory
            .prepare_adjust(&items, note, now_millis())?;
        self.push_then_commit(tx).await
    }

    async fn push_then_commit(&self, tx: InventoryTransaction) -> Result<InventoryTransaction, InventoryError> {
        if let Err(e) = self.catalog.push_transaction(&tx).await {
            tracing::error!(tx_id = %tx.id, kind = ?tx.kind, error = %e, "Remote stock update failed, local stock unchanged");
            return Err(e.into());
        }

        let committed = {
            let mut store = self.store.write();
            let before = store.inventory.low_stock_ids();
            store.inventory.commit(tx).map(|recorded| {
                let after = store.inventory.low_stock_ids();
                (recorded, newly_low(&before, after))
            })
        };
        let (recorded, low) = match committed {
            Ok(committed) => committed,
            Err(e) => {
                // 远端已接受，本地重新校验失败 (并发入库把库存推过上限)
                tracing::error!(error = %e, "Stock movement accepted remotely but rejected locally");
                return Err(e);
            }
        };

        tracing::info!(tx_id = %recorded.id, kind = ?recorded.kind, lines = recorded.lines.len(), "Stock movement recorded");
        self.events.publish(PosEvent::StockChanged(recorded.clone()));
        self.report_low_stock(low);
        Ok(recorded)
    }

    pub(crate) fn report_low_stock(&self, ids: Vec<String>) {
        if ids.is_empty() {
            return;
        }
        tracing::warn!(ingredients = ?ids, "Ingredients at or below minimum stock");
        self.events.publish(PosEvent::LowStock { ingredient_ids: ids });
    }

    /// Reload ingredients from the catalog backend; keeps current data on failure
    pub async fn refresh_ingredients(&self) -> bool {
        match self.catalog.list_ingredients().await {
            Ok(ingredients) => {
                let count = ingredients.len();
                self.store.write().inventory.replace_ingredients(ingredients);
                tracing::info!(count, "Ingredients loaded");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load ingredients, keeping current stock");
                false
            }
        }
    }

    pub fn low_stock_ids(&self) -> Vec<String> {
        self.store.read().inventory.low_stock_ids()
    }

    pub fn ingredient(&self, id: &str) -> Option<Ingredient> {
        self.store.read().inventory.ingredient(id).cloned()
    }

    pub fn ingredients(&self) -> Vec<Ingredient> {
        self.store.read().inventory.ingredients()
    }

    pub fn transactions(&self) -> Vec<InventoryTransaction> {
        self.store.read().inventory.transactions().to_vec()
    }

    pub fn transactions_for(&self, ingredient_id: &str) -> Vec<InventoryTransaction> {
        self.store.read().inventory.transactions_for(ingredient_id)
    }
}

/// Ids in `after` that were not low in `before`
pub(crate) fn newly_low(before: &[String], after: Vec<String>) -> Vec<String> {
    after.into_iter().filter(|id| !before.contains(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newly_low() {
        let before = vec!["rice".to_string()];
        let after = vec!["egg".to_string(), "rice".to_string()];
        assert_eq!(newly_low(&before, after), vec!["egg".to_string()]);
    }
}

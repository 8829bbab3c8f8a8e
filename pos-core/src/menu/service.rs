use super::MenuError;
use crate::backend::CatalogBackend;
use crate::core::store::SharedStore;
use shared::models::{Category, MenuItem};
use std::sync::Arc;

/// 菜单服务: 远端加载 + 员工编辑
#[derive(Clone)]
pub struct CatalogService {
    store: SharedStore,
    catalog: Arc<dyn CatalogBackend>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("store", &"<SharedStore>")
            .field("catalog", &"<dyn CatalogBackend>")
            .finish()
    }
}

impl CatalogService {
    pub fn new(store: SharedStore, catalog: Arc<dyn CatalogBackend>) -> Self {
        Self { store, catalog }
    }

    /// Reload categories and menu items. Each list is replaced only when its
    /// fetch succeeds, otherwise the current (snapshot) data stays.
    ///
    /// Returns true when both lists were refreshed.
    pub async fn refresh(&self) -> bool {
        let categories = match self.catalog.list_categories().await {
            Ok(categories) => Some(categories),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load categories, keeping current data");
                None
            }
        };
        let items = match self.catalog.list_menu_items().await {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load menu items, keeping current data");
                None
            }
        };

        let refreshed = categories.is_some() && items.is_some();
        let mut store = self.store.write();
        if let Some(categories) = categories {
            tracing::info!(count = categories.len(), "Categories loaded");
            store.menu.replace_categories(categories);
        }
        if let Some(items) = items {
            tracing::info!(count = items.len(), "Menu items loaded");
            store.menu.replace_items(items);
        }
        refreshed
    }

    pub fn upsert_menu_item(&self, item: MenuItem) -> Result<MenuItem, MenuError> {
        let item = self.store.write().menu.upsert(item)?;
        tracing::info!(menu_item_id = %item.id, sizes = item.sizes.len(), "Menu item saved");
        Ok(item)
    }

    /// Open orders keep the removed item's lines; they price at 0 from now on
    pub fn remove_menu_item(&self, id: &str) -> Result<MenuItem, MenuError> {
        let item = self.store.write().menu.remove(id)?;
        tracing::info!(menu_item_id = %id, "Menu item removed");
        Ok(item)
    }

    pub fn get_menu_item(&self, id: &str) -> Option<MenuItem> {
        self.store.read().menu.get(id).cloned()
    }

    pub fn list_menu_items(&self) -> Vec<MenuItem> {
        self.store.read().menu.list()
    }

    pub fn menu_items_in_category(&self, category_id: &str) -> Vec<MenuItem> {
        self.store.read().menu.by_category(category_id)
    }

    pub fn categories(&self) -> Vec<Category> {
        self.store.read().menu.categories().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::core::store::Store;
    use parking_lot::RwLock;
    use shared::models::{MenuItemSize, Recipe, RecipeIngredient};

    fn rice_bowl(price: f64) -> MenuItem {
        MenuItem::new(
            "rice-bowl",
            "Rice Bowl",
            vec![MenuItemSize::new(
                "Regular",
                price,
                Recipe::new(vec![RecipeIngredient::new("rice", 1.0)]),
            )],
        )
    }

    #[tokio::test]
    async fn test_refresh_replaces_menu() {
        let backend = Arc::new(MemoryBackend::new().with_menu(vec![], vec![rice_bowl(8.0)]));
        let store: SharedStore = Arc::new(RwLock::new(Store::new()));
        let service = CatalogService::new(store.clone(), backend);

        assert!(service.refresh().await);
        assert_eq!(service.get_menu_item("rice-bowl").unwrap().sizes[0].price, 8.0);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_current() {
        let backend = Arc::new(MemoryBackend::new().with_menu(vec![], vec![rice_bowl(8.0)]));
        backend.set_catalog_down(true);
        let store: SharedStore = Arc::new(RwLock::new(Store::new()));
        store.write().menu.replace_items(vec![rice_bowl(7.0)]);
        let service = CatalogService::new(store, backend);

        assert!(!service.refresh().await);
        assert_eq!(service.list_menu_items()[0].sizes[0].price, 7.0);
    }

    #[test]
    fn test_upsert_validates() {
        let backend = Arc::new(MemoryBackend::new());
        let store: SharedStore = Arc::new(RwLock::new(Store::new()));
        let service = CatalogService::new(store, backend);

        let mut bad = rice_bowl(8.0);
        bad.sizes[0].price = -1.0;
        assert!(service.upsert_menu_item(bad).is_err());
        assert!(service.list_menu_items().is_empty());

        service.upsert_menu_item(rice_bowl(9.0)).unwrap();
        assert!(service.remove_menu_item("rice-bowl").is_ok());
        assert!(matches!(
            service.remove_menu_item("rice-bowl"),
            Err(MenuError::NotFound(_))
        ));
    }
}

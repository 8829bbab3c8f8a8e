use super::MenuError;
use shared::models::{Category, MenuItem, MenuItemSize};
use std::collections::HashMap;

/// 内存菜单目录
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    items: HashMap<String, MenuItem>,
    categories: Vec<Category>,
}

impl MenuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&MenuItem> {
        self.items.get(id)
    }

    /// Size of a menu item by exact name
    pub fn resolve_size(&self, menu_item_id: &str, size_name: &str) -> Option<&MenuItemSize> {
        self.items.get(menu_item_id)?.size(size_name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items ordered by name
    pub fn list(&self) -> Vec<MenuItem> {
        let mut items: Vec<MenuItem> = self.items.values().cloned().collect();
        items.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        items
    }

    pub fn by_category(&self, category_id: &str) -> Vec<MenuItem> {
        self.list()
            .into_iter()
            .filter(|i| i.category_id.as_deref() == Some(category_id))
            .collect()
    }

    /// Categories ordered by `sort_order`
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Replace everything with backend or snapshot data. No validation: the
    /// editing rules are not applied retroactively.
    pub fn replace_items(&mut self, items: Vec<MenuItem>) {
        self.items = items.into_iter().map(|i| (i.id.clone(), i)).collect();
    }

    pub fn replace_categories(&mut self, mut categories: Vec<Category>) {
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        self.categories = categories;
    }

    /// Staff edit: validated before it lands
    pub fn upsert(&mut self, item: MenuItem) -> Result<MenuItem, MenuError> {
        item.validate()?;
        self.items.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    pub fn remove(&mut self, id: &str) -> Result<MenuItem, MenuError> {
        self.items
            .remove(id)
            .ok_or_else(|| MenuError::NotFound(id.to_string()))
    }

    pub fn snapshot_items(&self) -> Vec<MenuItem> {
        self.items.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MenuValidationError, Recipe, RecipeIngredient};

    fn rice_bowl() -> MenuItem {
        MenuItem::new(
            "rice-bowl",
            "Rice Bowl",
            vec![MenuItemSize::new(
                "Regular",
                8.5,
                Recipe::new(vec![RecipeIngredient::new("rice", 1.0)]),
            )],
        )
    }

    #[test]
    fn test_upsert_and_resolve() {
        let mut catalog = MenuCatalog::new();
        catalog.upsert(rice_bowl()).unwrap();

        assert_eq!(catalog.resolve_size("rice-bowl", "Regular").unwrap().price, 8.5);
        assert!(catalog.resolve_size("rice-bowl", "Large").is_none());
        assert!(catalog.resolve_size("soup", "Regular").is_none());
    }

    #[test]
    fn test_upsert_rejects_invalid() {
        let mut catalog = MenuCatalog::new();
        let mut item = rice_bowl();
        item.sizes[0].recipe = Recipe::default();

        let err = catalog.upsert(item).unwrap_err();
        assert!(matches!(
            err,
            MenuError::Invalid(MenuValidationError::EmptyRecipe { .. })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_replace_skips_validation() {
        let mut catalog = MenuCatalog::new();
        let mut item = rice_bowl();
        item.sizes.clear();
        catalog.replace_items(vec![item]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_categories_sorted() {
        let mut catalog = MenuCatalog::new();
        catalog.replace_categories(vec![
            Category {
                id: "drinks".into(),
                name: "Drinks".into(),
                sort_order: 2,
                is_active: true,
            },
            Category {
                id: "mains".into(),
                name: "Mains".into(),
                sort_order: 1,
                is_active: true,
            },
        ]);
        assert_eq!(catalog.categories()[0].id, "mains");
    }
}

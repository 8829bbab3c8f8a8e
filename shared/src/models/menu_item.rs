//! Menu Item Model
//!
//! A menu item owns an ordered list of sizes; each size owns a price and exactly
//! one recipe; a recipe is an ordered list of (ingredient, quantity) lines
//! consumed to produce one unit of that size.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Upper bound for a size price
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Upper bound for one recipe line (per unit sold)
pub const MAX_RECIPE_QUANTITY: f64 = 10_000.0;

/// Recipe line: quantity of one ingredient per unit sold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub ingredient_id: String,
    pub quantity: f64,
}

impl RecipeIngredient {
    pub fn new(ingredient_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            quantity,
        }
    }
}

/// Recipe (配方)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    pub fn new(ingredients: Vec<RecipeIngredient>) -> Self {
        Self { ingredients }
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }
}

/// Size variant of a menu item (规格)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItemSize {
    pub name: String,
    /// Price in currency unit
    pub price: f64,
    #[serde(default)]
    pub recipe: Recipe,
}

impl MenuItemSize {
    pub fn new(name: impl Into<String>, price: f64, recipe: Recipe) -> Self {
        Self {
            name: name.into(),
            price,
            recipe,
        }
    }
}

/// Menu item entity (菜品)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub sizes: Vec<MenuItemSize>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Reasons a menu item fails the editing-workflow checks
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuValidationError {
    #[error("Menu item {0} has no sizes")]
    NoSizes(String),

    #[error("Size name is empty on menu item {0}")]
    EmptySizeName(String),

    #[error("Duplicate size {size} on menu item {item}")]
    DuplicateSize { item: String, size: String },

    #[error("Size {size} of {item} has invalid price {price}")]
    InvalidPrice { item: String, size: String, price: f64 },

    #[error("Size {size} of {item} has an empty recipe")]
    EmptyRecipe { item: String, size: String },

    #[error("Recipe line {ingredient} of {item}/{size} has invalid quantity {quantity}")]
    InvalidRecipeQuantity {
        item: String,
        size: String,
        ingredient: String,
        quantity: f64,
    },
}

impl MenuItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sizes: Vec<MenuItemSize>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category_id: None,
            sizes,
            is_active: true,
        }
    }

    /// Look up a size by its exact name
    pub fn size(&self, name: &str) -> Option<&MenuItemSize> {
        self.sizes.iter().find(|s| s.name == name)
    }

    /// Creation-time checks. Not applied to data hydrated from the backend.
    pub fn validate(&self) -> Result<(), MenuValidationError> {
        if self.sizes.is_empty() {
            return Err(MenuValidationError::NoSizes(self.id.clone()));
        }
        let mut seen = HashSet::new();
        for size in &self.sizes {
            if size.name.trim().is_empty() {
                return Err(MenuValidationError::EmptySizeName(self.id.clone()));
            }
            if !seen.insert(size.name.as_str()) {
                return Err(MenuValidationError::DuplicateSize {
                    item: self.id.clone(),
                    size: size.name.clone(),
                });
            }
            if !(size.price.is_finite() && (0.0..=MAX_PRICE).contains(&size.price)) {
                return Err(MenuValidationError::InvalidPrice {
                    item: self.id.clone(),
                    size: size.name.clone(),
                    price: size.price,
                });
            }
            if size.recipe.is_empty() {
                return Err(MenuValidationError::EmptyRecipe {
                    item: self.id.clone(),
                    size: size.name.clone(),
                });
            }
            if let Some(line) = size
                .recipe
                .ingredients
                .iter()
                .find(|l| {
                    !(l.quantity.is_finite() && l.quantity > 0.0 && l.quantity <= MAX_RECIPE_QUANTITY)
                })
            {
                return Err(MenuValidationError::InvalidRecipeQuantity {
                    item: self.id.clone(),
                    size: size.name.clone(),
                    ingredient: line.ingredient_id.clone(),
                    quantity: line.quantity,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice_bowl() -> MenuItem {
        MenuItem::new(
            "m1",
            "Rice Bowl",
            vec![
                MenuItemSize::new(
                    "Regular",
                    8.5,
                    Recipe::new(vec![RecipeIngredient::new("rice", 2.0)]),
                ),
                MenuItemSize::new(
                    "Large",
                    11.0,
                    Recipe::new(vec![
                        RecipeIngredient::new("rice", 3.0),
                        RecipeIngredient::new("egg", 1.0),
                    ]),
                ),
            ],
        )
    }

    #[test]
    fn test_size_lookup_is_exact() {
        let item = rice_bowl();
        assert_eq!(item.size("Large").map(|s| s.price), Some(11.0));
        assert!(item.size("large").is_none());
    }

    #[test]
    fn test_valid_item_passes() {
        assert_eq!(rice_bowl().validate(), Ok(()));
    }

    #[test]
    fn test_empty_recipe_rejected() {
        let mut item = rice_bowl();
        item.sizes[1].recipe = Recipe::default();
        assert!(matches!(
            item.validate(),
            Err(MenuValidationError::EmptyRecipe { size, .. }) if size == "Large"
        ));
    }

    #[test]
    fn test_zero_quantity_line_rejected() {
        let mut item = rice_bowl();
        item.sizes[0].recipe.ingredients[0].quantity = 0.0;
        assert!(matches!(
            item.validate(),
            Err(MenuValidationError::InvalidRecipeQuantity { ingredient, .. }) if ingredient == "rice"
        ));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut item = rice_bowl();
        item.sizes[0].price = 1e25;
        assert!(matches!(
            item.validate(),
            Err(MenuValidationError::InvalidPrice { size, .. }) if size == "Regular"
        ));

        let mut item = rice_bowl();
        item.sizes[1].recipe.ingredients[1].quantity = MAX_RECIPE_QUANTITY * 2.0;
        assert!(matches!(
            item.validate(),
            Err(MenuValidationError::InvalidRecipeQuantity { ingredient, .. }) if ingredient == "egg"
        ));

        let mut item = rice_bowl();
        item.sizes[0].price = MAX_PRICE;
        assert_eq!(item.validate(), Ok(()));
    }

    #[test]
    fn test_duplicate_size_rejected() {
        let mut item = rice_bowl();
        item.sizes[1].name = "Regular".into();
        assert!(matches!(
            item.validate(),
            Err(MenuValidationError::DuplicateSize { .. })
        ));
    }

    #[test]
    fn test_no_sizes_rejected() {
        let item = MenuItem::new("m2", "Water", vec![]);
        assert_eq!(item.validate(), Err(MenuValidationError::NoSizes("m2".into())));
    }
}

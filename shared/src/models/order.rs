//! Order Model

use serde::{Deserialize, Serialize};

/// Order item: a menu item at a chosen size
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub menu_item_id: String,
    /// Size name, resolved against the menu item's sizes when pricing
    pub size_name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderItem {
    pub fn new(menu_item_id: impl Into<String>, size_name: impl Into<String>, quantity: u32) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            size_name: size_name.into(),
            quantity,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Order entity (订单)
///
/// `subtotal` and `total` are derived from `items` and `discount_percent`
/// and are recomputed on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub table_id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Currency unit, 2 dp
    #[serde(default)]
    pub subtotal: f64,
    /// Currency unit, 2 dp
    #[serde(default)]
    pub total: f64,
    /// 0..=100
    #[serde(default)]
    pub discount_percent: f64,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Order {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

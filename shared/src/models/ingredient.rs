//! Ingredient and Inventory Transaction Models

use serde::{Deserialize, Serialize};

/// Ingredient entity (原料)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Unit of measure, e.g. "kg", "pcs"
    pub unit: String,
    /// Current stock, never negative
    #[serde(default)]
    pub stock: f64,
    /// Low-stock threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stock: Option<f64>,
    /// Unit purchase price in currency unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit: impl Into<String>, stock: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            stock,
            min_stock: None,
            unit_price: None,
        }
    }

    pub fn with_min_stock(mut self, min_stock: f64) -> Self {
        self.min_stock = Some(min_stock);
        self
    }

    /// `stock <= min_stock`; ingredients without a threshold are never low
    pub fn is_low_stock(&self) -> bool {
        self.min_stock.is_some_and(|min| self.stock <= min)
    }
}

/// 库存流水类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// 入库 (supplier delivery)
    In,
    /// 盘点调整 (manual correction)
    Adjust,
    /// 出品消耗 (kitchen dispatch)
    Consume,
}

/// One ingredient movement within a transaction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionLine {
    pub ingredient_id: String,
    /// Signed requested delta
    pub delta: f64,
    /// Portion of a negative delta that could not be applied because stock hit zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortfall: Option<f64>,
}

/// Inventory transaction (append-only audit record)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryTransaction {
    pub id: String,
    pub kind: TransactionKind,
    pub lines: Vec<TransactionLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    /// Order whose dispatch produced a CONSUME transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl InventoryTransaction {
    /// Delta recorded for an ingredient, if the transaction touches it
    pub fn delta_for(&self, ingredient_id: &str) -> Option<f64> {
        self.lines
            .iter()
            .find(|l| l.ingredient_id == ingredient_id)
            .map(|l| l.delta)
    }
}

/// Stock movement input (IN / ADJUST)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockDelta {
    pub ingredient_id: String,
    pub quantity: f64,
}

impl StockDelta {
    pub fn new(ingredient_id: impl Into<String>, quantity: f64) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_stock_requires_threshold() {
        let flour = Ingredient::new("flour", "Flour", "kg", 0.0);
        assert!(!flour.is_low_stock());

        let sugar = Ingredient::new("sugar", "Sugar", "kg", 2.0).with_min_stock(2.0);
        assert!(sugar.is_low_stock());

        let salt = Ingredient::new("salt", "Salt", "kg", 2.5).with_min_stock(2.0);
        assert!(!salt.is_low_stock());
    }

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(serde_json::to_string(&TransactionKind::Consume).unwrap(), "\"CONSUME\"");
        let kind: TransactionKind = serde_json::from_str("\"IN\"").unwrap();
        assert_eq!(kind, TransactionKind::In);
    }
}

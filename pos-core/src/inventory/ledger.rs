use super::{InventoryError, OverconsumptionPolicy};
use crate::menu::MenuCatalog;
use rust_decimal::prelude::*;
use shared::models::{
    Ingredient, InventoryTransaction, OrderItem, StockDelta, TransactionKind, TransactionLine,
};
use shared::util::prefixed_id;
use std::collections::HashMap;

/// Ingredient quantities are kept to 3 dp
const QTY_PLACES: u32 = 3;

/// Per-line limit for IN / ADJUST quantities
pub const MAX_STOCK_DELTA: f64 = 1_000_000.0;

/// Upper bound for any stock level
pub const MAX_STOCK: f64 = 1_000_000_000.0;

/// `None` for NaN, infinities and values Decimal cannot hold
fn qty(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

fn max_stock() -> Decimal {
    Decimal::from(MAX_STOCK as i64)
}

fn qty_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(QTY_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Aggregated requirement of one ingredient for a set of order items
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionLine {
    pub ingredient_id: String,
    pub quantity: f64,
}

/// 库存台账
#[derive(Debug, Clone, Default)]
pub struct InventoryLedger {
    ingredients: HashMap<String, Ingredient>,
    transactions: Vec<InventoryTransaction>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ingredient list (hydration). Negative stock is clamped.
    pub fn replace_ingredients(&mut self, ingredients: Vec<Ingredient>) {
        self.ingredients = ingredients
            .into_iter()
            .map(|mut i| {
                if !(i.stock.is_finite() && i.stock >= 0.0) {
                    i.stock = 0.0;
                } else if i.stock > MAX_STOCK {
                    tracing::warn!(ingredient_id = %i.id, stock = i.stock, "Stock above supported maximum, capped");
                    i.stock = MAX_STOCK;
                }
                (i.id.clone(), i)
            })
            .collect();
    }

    /// Restore the audit trail from a snapshot
    pub fn restore_transactions(&mut self, transactions: Vec<InventoryTransaction>) {
        self.transactions = transactions;
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    /// Ingredients ordered by name
    pub fn ingredients(&self) -> Vec<Ingredient> {
        let mut list: Vec<Ingredient> = self.ingredients.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Full audit trail, oldest first
    pub fn transactions(&self) -> &[InventoryTransaction] {
        &self.transactions
    }

    pub fn transactions_for(&self, ingredient_id: &str) -> Vec<InventoryTransaction> {
        self.transactions
            .iter()
            .filter(|tx| tx.delta_for(ingredient_id).is_some())
            .cloned()
            .collect()
    }

    /// Ids with `stock <= min_stock`, sorted
    pub fn low_stock_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .ingredients
            .values()
            .filter(|i| i.is_low_stock())
            .map(|i| i.id.clone())
            .collect();
        ids.sort();
        ids
    }

    // ========== IN / ADJUST ==========

    /// Build an IN transaction without applying it
    pub fn prepare_in(
        &self,
        items: &[StockDelta],
        supplier_id: Option<String>,
        note: Option<String>,
        now: i64,
    ) -> Result<InventoryTransaction, InventoryError> {
        self.validate_deltas(items, |q| q > 0.0)?;
        Ok(Self::build(TransactionKind::In, items, supplier_id, note, now))
    }

    /// Build an ADJUST transaction without applying it
    pub fn prepare_adjust(
        &self,
        items: &[StockDelta],
        note: Option<String>,
        now: i64,
    ) -> Result<InventoryTransaction, InventoryError> {
        self.validate_deltas(items, |q| q != 0.0)?;
        Ok(Self::build(TransactionKind::Adjust, items, None, note, now))
    }

    pub fn record_inventory_in(
        &mut self,
        items: &[StockDelta],
        supplier_id: Option<String>,
        note: Option<String>,
        now: i64,
    ) -> Result<InventoryTransaction, InventoryError> {
        let tx = self.prepare_in(items, supplier_id, note, now)?;
        self.commit(tx)
    }

    pub fn adjust_inventory(
        &mut self,
        items: &[StockDelta],
        note: Option<String>,
        now: i64,
    ) -> Result<InventoryTransaction, InventoryError> {
        let tx = self.prepare_adjust(items, note, now)?;
        self.commit(tx)
    }

    fn validate_deltas(
        &self,
        items: &[StockDelta],
        accept: impl Fn(f64) -> bool,
    ) -> Result<(), InventoryError> {
        if items.is_empty() {
            return Err(InventoryError::EmptyItems);
        }
        for item in items {
            let in_range = item.quantity.is_finite() && item.quantity.abs() <= MAX_STOCK_DELTA;
            if !in_range || !accept(item.quantity) {
                return Err(InventoryError::InvalidQuantity {
                    ingredient_id: item.ingredient_id.clone(),
                    quantity: item.quantity,
                });
            }
            if !self.ingredients.contains_key(&item.ingredient_id) {
                return Err(InventoryError::IngredientNotFound(item.ingredient_id.clone()));
            }
        }
        // dry run: the resulting stock must stay in range
        self.apply_lines(items.iter().map(|d| (d.ingredient_id.as_str(), d.quantity)))?;
        Ok(())
    }

    fn build(
        kind: TransactionKind,
        items: &[StockDelta],
        supplier_id: Option<String>,
        note: Option<String>,
        now: i64,
    ) -> InventoryTransaction {
        InventoryTransaction {
            id: prefixed_id("tx"),
            kind,
            lines: items
                .iter()
                .map(|d| TransactionLine {
                    ingredient_id: d.ingredient_id.clone(),
                    delta: qty(d.quantity).map(qty_f64).unwrap_or_default(),
                    shortfall: None,
                })
                .collect(),
            supplier_id,
            order_id: None,
            created_at: now,
            note,
        }
    }

    /// New stock per touched ingredient plus the shortfall of each line.
    ///
    /// Unknown ingredients are skipped (no stock entry, shortfall of the whole
    /// negative delta). Nothing is mutated.
    fn apply_lines<'a>(
        &self,
        lines: impl Iterator<Item = (&'a str, f64)>,
    ) -> Result<(HashMap<String, Decimal>, Vec<Option<f64>>), InventoryError> {
        let mut next_stock: HashMap<String, Decimal> = HashMap::new();
        let mut shortfalls = Vec::new();

        for (ingredient_id, raw_delta) in lines {
            let delta = qty(raw_delta).ok_or_else(|| InventoryError::InvalidQuantity {
                ingredient_id: ingredient_id.to_string(),
                quantity: raw_delta,
            })?;
            let Some(ingredient) = self.ingredients.get(ingredient_id) else {
                shortfalls.push((delta < Decimal::ZERO).then(|| qty_f64(-delta)));
                continue;
            };
            let current = match next_stock.get(ingredient_id) {
                Some(stock) => *stock,
                None => qty(ingredient.stock).unwrap_or_default(),
            };
            let next = current
                .checked_add(delta)
                .ok_or_else(|| InventoryError::QuantityOverflow(ingredient_id.to_string()))?;
            let (next, shortfall) = if next < Decimal::ZERO {
                (Decimal::ZERO, Some(qty_f64(-next)))
            } else {
                (next, None)
            };
            if next > max_stock() {
                return Err(InventoryError::StockOutOfRange {
                    ingredient_id: ingredient_id.to_string(),
                    stock: qty_f64(next),
                });
            }
            next_stock.insert(ingredient_id.to_string(), next);
            shortfalls.push(shortfall);
        }
        Ok((next_stock, shortfalls))
    }

    /// Apply a prepared transaction and append it to the log.
    ///
    /// All lines are checked before any stock changes. Stock is floored at
    /// zero; the clamped part of a negative delta is recorded as the line's
    /// shortfall.
    pub fn commit(&mut self, mut tx: InventoryTransaction) -> Result<InventoryTransaction, InventoryError> {
        let (next_stock, shortfalls) = self.apply_lines(
            tx.lines
                .iter()
                .map(|line| (line.ingredient_id.as_str(), line.delta)),
        )?;

        for (line, shortfall) in tx.lines.iter_mut().zip(shortfalls) {
            let Some(ingredient) = self.ingredients.get(&line.ingredient_id) else {
                tracing::warn!(ingredient_id = %line.ingredient_id, tx_id = %tx.id, "Ingredient unknown, line not applied");
                line.shortfall = shortfall;
                continue;
            };
            if let Some(shortfall) = shortfall {
                tracing::warn!(
                    ingredient_id = %line.ingredient_id,
                    stock = ingredient.stock,
                    delta = line.delta,
                    shortfall,
                    "Stock clamped at zero"
                );
            }
            line.shortfall = shortfall;
        }
        for (id, stock) in next_stock {
            if let Some(ingredient) = self.ingredients.get_mut(&id) {
                ingredient.stock = qty_f64(stock);
            }
        }
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    // ========== CONSUME ==========

    /// Σ(recipe qty × item qty) per ingredient, in first-seen order.
    ///
    /// Lines whose menu item or size is gone contribute nothing.
    pub fn plan_consumption(
        items: &[OrderItem],
        menu: &MenuCatalog,
    ) -> Result<Vec<ConsumptionLine>, InventoryError> {
        let mut order: Vec<String> = Vec::new();
        let mut totals: HashMap<String, Decimal> = HashMap::new();

        for item in items {
            let Some(size) = menu.resolve_size(&item.menu_item_id, &item.size_name) else {
                tracing::warn!(
                    menu_item_id = %item.menu_item_id,
                    size = %item.size_name,
                    "No recipe for order line, nothing consumed"
                );
                continue;
            };
            for line in &size.recipe.ingredients {
                // 后端同步的配方不经编辑校验
                let per_unit = qty(line.quantity)
                    .filter(|q| *q >= Decimal::ZERO)
                    .ok_or_else(|| InventoryError::InvalidQuantity {
                        ingredient_id: line.ingredient_id.clone(),
                        quantity: line.quantity,
                    })?;
                let overflow = || InventoryError::QuantityOverflow(line.ingredient_id.clone());
                let required = per_unit
                    .checked_mul(Decimal::from(item.quantity))
                    .ok_or_else(overflow)?;
                match totals.get_mut(&line.ingredient_id) {
                    Some(total) => *total = total.checked_add(required).ok_or_else(overflow)?,
                    None => {
                        order.push(line.ingredient_id.clone());
                        totals.insert(line.ingredient_id.clone(), required);
                    }
                }
            }
        }

        Ok(order
            .into_iter()
            .map(|id| {
                let quantity = totals.get(&id).copied().map(qty_f64).unwrap_or_default();
                ConsumptionLine {
                    ingredient_id: id,
                    quantity,
                }
            })
            .collect())
    }

    /// Deduct stock for a batch of order items as a single CONSUME transaction
    pub fn consume_by_order_items(
        &mut self,
        items: &[OrderItem],
        menu: &MenuCatalog,
        policy: OverconsumptionPolicy,
        order_id: Option<&str>,
        now: i64,
    ) -> Result<InventoryTransaction, InventoryError> {
        let plan = Self::plan_consumption(items, menu)?;

        if policy == OverconsumptionPolicy::Reject {
            for line in &plan {
                let available = self
                    .ingredients
                    .get(&line.ingredient_id)
                    .map(|i| i.stock)
                    .ok_or_else(|| InventoryError::IngredientNotFound(line.ingredient_id.clone()))?;
                if available < line.quantity {
                    return Err(InventoryError::InsufficientStock {
                        ingredient_id: line.ingredient_id.clone(),
                        requested: line.quantity,
                        available,
                    });
                }
            }
        }

        let tx = InventoryTransaction {
            id: prefixed_id("tx"),
            kind: TransactionKind::Consume,
            lines: plan
                .into_iter()
                .map(|line| TransactionLine {
                    ingredient_id: line.ingredient_id,
                    delta: -line.quantity,
                    shortfall: None,
                })
                .collect(),
            supplier_id: None,
            order_id: order_id.map(str::to_string),
            created_at: now,
            note: None,
        };
        self.commit(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{MenuItem, MenuItemSize, Recipe, RecipeIngredient};

    fn create_test_ledger() -> InventoryLedger {
        let mut ledger = InventoryLedger::new();
        ledger.replace_ingredients(vec![
            Ingredient::new("rice", "Rice", "kg", 10.0).with_min_stock(3.0),
            Ingredient::new("egg", "Egg", "pcs", 4.0),
            Ingredient::new("sugar", "Sugar", "kg", 3.0),
        ]);
        ledger
    }

    fn create_test_menu() -> MenuCatalog {
        let mut menu = MenuCatalog::new();
        menu.replace_items(vec![
            MenuItem::new(
                "fried-rice",
                "Fried Rice",
                vec![
                    MenuItemSize::new(
                        "Regular",
                        9.0,
                        Recipe::new(vec![
                            RecipeIngredient::new("rice", 1.0),
                            RecipeIngredient::new("egg", 1.0),
                        ]),
                    ),
                    MenuItemSize::new(
                        "Large",
                        12.0,
                        Recipe::new(vec![
                            RecipeIngredient::new("rice", 1.5),
                            RecipeIngredient::new("egg", 2.0),
                        ]),
                    ),
                ],
            ),
            MenuItem::new(
                "rice-bowl",
                "Rice Bowl",
                vec![MenuItemSize::new(
                    "Regular",
                    5.0,
                    Recipe::new(vec![RecipeIngredient::new("rice", 0.1)]),
                )],
            ),
        ]);
        menu
    }

    #[test]
    fn test_inventory_in() {
        let mut ledger = create_test_ledger();
        let tx = ledger
            .record_inventory_in(&[StockDelta::new("sugar", 5.0)], Some("sup-1".into()), None, 1)
            .unwrap();

        assert_eq!(tx.kind, TransactionKind::In);
        assert_eq!(tx.delta_for("sugar"), Some(5.0));
        assert_eq!(tx.supplier_id.as_deref(), Some("sup-1"));
        assert_eq!(ledger.ingredient("sugar").unwrap().stock, 8.0);
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn test_inventory_in_rejects_bad_lines() {
        let mut ledger = create_test_ledger();
        assert!(matches!(
            ledger.record_inventory_in(&[], None, None, 1),
            Err(InventoryError::EmptyItems)
        ));
        assert!(matches!(
            ledger.record_inventory_in(&[StockDelta::new("sugar", -1.0)], None, None, 1),
            Err(InventoryError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            ledger.record_inventory_in(
                &[StockDelta::new("sugar", 1.0), StockDelta::new("salt", 1.0)],
                None,
                None,
                1
            ),
            Err(InventoryError::IngredientNotFound(_))
        ));
        // nothing applied
        assert_eq!(ledger.ingredient("sugar").unwrap().stock, 3.0);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_adjust_floors_at_zero() {
        let mut ledger = create_test_ledger();
        let tx = ledger
            .adjust_inventory(&[StockDelta::new("egg", -6.0)], Some("broken".into()), 1)
            .unwrap();

        assert_eq!(ledger.ingredient("egg").unwrap().stock, 0.0);
        assert_eq!(tx.lines[0].delta, -6.0);
        assert_eq!(tx.lines[0].shortfall, Some(2.0));
        assert!(matches!(
            ledger.adjust_inventory(&[StockDelta::new("egg", 0.0)], None, 2),
            Err(InventoryError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn test_plan_aggregates_across_items() {
        let menu = create_test_menu();
        let plan = InventoryLedger::plan_consumption(
            &[
                OrderItem::new("fried-rice", "Regular", 2),
                OrderItem::new("fried-rice", "Large", 1),
                OrderItem::new("rice-bowl", "Regular", 3),
            ],
            &menu,
        )
        .unwrap();
        assert_eq!(
            plan,
            vec![
                ConsumptionLine {
                    ingredient_id: "rice".into(),
                    quantity: 3.8,
                },
                ConsumptionLine {
                    ingredient_id: "egg".into(),
                    quantity: 4.0,
                },
            ]
        );
    }

    #[test]
    fn test_consume_single_transaction() {
        let mut ledger = create_test_ledger();
        let menu = create_test_menu();
        let tx = ledger
            .consume_by_order_items(
                &[
                    OrderItem::new("fried-rice", "Regular", 1),
                    OrderItem::new("rice-bowl", "Regular", 3),
                ],
                &menu,
                OverconsumptionPolicy::Clamp,
                Some("o-1"),
                5,
            )
            .unwrap();

        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(tx.kind, TransactionKind::Consume);
        assert_eq!(tx.order_id.as_deref(), Some("o-1"));
        assert_eq!(tx.delta_for("rice"), Some(-1.3));
        assert_eq!(tx.delta_for("egg"), Some(-1.0));
        assert_eq!(ledger.ingredient("rice").unwrap().stock, 8.7);
        assert_eq!(ledger.ingredient("egg").unwrap().stock, 3.0);
    }

    #[test]
    fn test_consume_clamps_and_records_shortfall() {
        let mut ledger = create_test_ledger();
        let menu = create_test_menu();
        let tx = ledger
            .consume_by_order_items(
                &[OrderItem::new("fried-rice", "Large", 3)],
                &menu,
                OverconsumptionPolicy::Clamp,
                None,
                5,
            )
            .unwrap();

        let egg = tx.lines.iter().find(|l| l.ingredient_id == "egg").unwrap();
        assert_eq!(egg.delta, -6.0);
        assert_eq!(egg.shortfall, Some(2.0));
        assert_eq!(ledger.ingredient("egg").unwrap().stock, 0.0);
        assert_eq!(ledger.ingredient("rice").unwrap().stock, 5.5);
    }

    #[test]
    fn test_consume_reject_policy_leaves_stock() {
        let mut ledger = create_test_ledger();
        let menu = create_test_menu();
        let err = ledger
            .consume_by_order_items(
                &[OrderItem::new("fried-rice", "Large", 3)],
                &menu,
                OverconsumptionPolicy::Reject,
                None,
                5,
            )
            .unwrap_err();

        assert!(matches!(err, InventoryError::InsufficientStock { ref ingredient_id, .. } if ingredient_id == "egg"));
        assert_eq!(ledger.ingredient("egg").unwrap().stock, 4.0);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_low_stock_ids() {
        let mut ledger = create_test_ledger();
        assert!(ledger.low_stock_ids().is_empty());

        ledger
            .adjust_inventory(&[StockDelta::new("rice", -7.0)], None, 1)
            .unwrap();
        assert_eq!(ledger.low_stock_ids(), vec!["rice".to_string()]);
        assert_eq!(ledger.transactions_for("rice").len(), 1);
        assert!(ledger.transactions_for("egg").is_empty());
    }

    #[test]
    fn test_stock_never_negative_over_sequence() {
        let mut ledger = create_test_ledger();
        let menu = create_test_menu();
        ledger
            .adjust_inventory(&[StockDelta::new("rice", -9.5)], None, 1)
            .unwrap();
        ledger
            .consume_by_order_items(
                &[OrderItem::new("fried-rice", "Large", 2)],
                &menu,
                OverconsumptionPolicy::Clamp,
                None,
                2,
            )
            .unwrap();
        ledger
            .record_inventory_in(&[StockDelta::new("rice", 0.25)], None, None, 3)
            .unwrap();
        ledger
            .adjust_inventory(&[StockDelta::new("rice", -1.0)], None, 4)
            .unwrap();

        for ingredient in ledger.ingredients() {
            assert!(ingredient.stock >= 0.0, "{} went negative", ingredient.id);
        }
        assert_eq!(ledger.transactions().len(), 4);
    }

    #[test]
    fn test_huge_in_rejected_without_panic() {
        let mut ledger = create_test_ledger();
        for quantity in [5e28, 1e30, MAX_STOCK_DELTA + 1.0] {
            assert!(matches!(
                ledger.record_inventory_in(&[StockDelta::new("sugar", quantity)], None, None, 1),
                Err(InventoryError::InvalidQuantity { .. })
            ));
        }
        assert_eq!(ledger.ingredient("sugar").unwrap().stock, 3.0);
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn test_in_above_max_stock_rejected() {
        let mut ledger = InventoryLedger::new();
        ledger.replace_ingredients(vec![
            Ingredient::new("rice", "Rice", "kg", MAX_STOCK - MAX_STOCK_DELTA),
            Ingredient::new("flour", "Flour", "kg", 1e30),
        ]);
        // hydrated values beyond the range are capped
        assert_eq!(ledger.ingredient("flour").unwrap().stock, MAX_STOCK);

        // two lines on one ingredient compound
        let err = ledger
            .record_inventory_in(
                &[
                    StockDelta::new("rice", MAX_STOCK_DELTA),
                    StockDelta::new("rice", 1.0),
                ],
                None,
                None,
                1,
            )
            .unwrap_err();
        assert!(matches!(err, InventoryError::StockOutOfRange { ref ingredient_id, .. } if ingredient_id == "rice"));
        assert_eq!(ledger.ingredient("rice").unwrap().stock, MAX_STOCK - MAX_STOCK_DELTA);

        ledger
            .record_inventory_in(&[StockDelta::new("rice", MAX_STOCK_DELTA)], None, None, 2)
            .unwrap();
        assert_eq!(ledger.ingredient("rice").unwrap().stock, MAX_STOCK);
        assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn test_consume_with_oversized_recipe_is_error() {
        let mut ledger = create_test_ledger();
        let mut menu = MenuCatalog::new();
        menu.replace_items(vec![
            MenuItem::new(
                "feast",
                "Feast",
                vec![MenuItemSize::new(
                    "Regular",
                    9.0,
                    Recipe::new(vec![RecipeIngredient::new("rice", 5e28)]),
                )],
            ),
            MenuItem::new(
                "broken",
                "Broken",
                vec![MenuItemSize::new(
                    "Regular",
                    9.0,
                    Recipe::new(vec![RecipeIngredient::new("rice", 1e30)]),
                )],
            ),
        ]);

        let err = ledger
            .consume_by_order_items(
                &[OrderItem::new("feast", "Regular", 9999)],
                &menu,
                OverconsumptionPolicy::Clamp,
                None,
                1,
            )
            .unwrap_err();
        assert!(matches!(err, InventoryError::QuantityOverflow(ref id) if id == "rice"));

        let err = ledger
            .consume_by_order_items(
                &[OrderItem::new("broken", "Regular", 1)],
                &menu,
                OverconsumptionPolicy::Clamp,
                None,
                1,
            )
            .unwrap_err();
        assert!(matches!(err, InventoryError::InvalidQuantity { .. }));

        assert_eq!(ledger.ingredient("rice").unwrap().stock, 10.0);
        assert!(ledger.transactions().is_empty());
    }
}

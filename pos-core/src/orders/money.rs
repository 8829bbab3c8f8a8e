//! Money calculation utilities using rust_decimal for precision
//!
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization.

use super::OrderError;
use crate::menu::MenuCatalog;
use rust_decimal::prelude::*;
use shared::models::{MAX_PRICE, Order, OrderItem};

/// Rounding strategy for monetary values (2 decimal places, half away from zero)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Convert f64 to Decimal; non-finite values become zero
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal to f64 for storage, rounded to 2 dp
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate incoming order lines against the current menu
pub fn validate_items(items: &[OrderItem], menu: &MenuCatalog) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyItems);
    }
    for item in items {
        if item.quantity == 0 || item.quantity > MAX_QUANTITY {
            return Err(OrderError::InvalidQuantity {
                menu_item_id: item.menu_item_id.clone(),
                quantity: item.quantity,
            });
        }
        let menu_item = menu
            .get(&item.menu_item_id)
            .ok_or_else(|| OrderError::MenuItemNotFound(item.menu_item_id.clone()))?;
        if menu_item.size(&item.size_name).is_none() {
            return Err(OrderError::SizeNotFound {
                menu_item_id: item.menu_item_id.clone(),
                size_name: item.size_name.clone(),
            });
        }
    }
    Ok(())
}

/// 折扣百分比 0..=100
pub fn validate_discount(percent: f64) -> Result<(), OrderError> {
    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(OrderError::InvalidDiscount(percent));
    }
    Ok(())
}

/// Unit price of a line; a vanished menu item or size resolves to zero
pub fn unit_price(item: &OrderItem, menu: &MenuCatalog) -> Result<Decimal, OrderError> {
    let Some(size) = menu.resolve_size(&item.menu_item_id, &item.size_name) else {
        tracing::warn!(
            menu_item_id = %item.menu_item_id,
            size = %item.size_name,
            "Size no longer on the menu, priced at 0"
        );
        return Ok(Decimal::ZERO);
    };
    // 后端同步的菜单不经过编辑校验，这里兜底
    if !(size.price.is_finite() && (0.0..=MAX_PRICE).contains(&size.price)) {
        return Err(OrderError::PriceOutOfRange {
            menu_item_id: item.menu_item_id.clone(),
            size_name: item.size_name.clone(),
            price: size.price,
        });
    }
    Ok(to_decimal(size.price))
}

/// Σ(price × quantity)
pub fn calculate_subtotal(items: &[OrderItem], menu: &MenuCatalog) -> Result<Decimal, OrderError> {
    items.iter().try_fold(Decimal::ZERO, |acc, item| {
        unit_price(item, menu)?
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line| acc.checked_add(line))
            .ok_or_else(|| OrderError::AmountOverflow(item.menu_item_id.clone()))
    })
}

/// subtotal × (1 − discount/100)
pub fn apply_discount(subtotal: Decimal, discount_percent: f64) -> Result<Decimal, OrderError> {
    let rate = to_decimal(discount_percent) / Decimal::ONE_HUNDRED;
    subtotal
        .checked_mul(Decimal::ONE - rate)
        .ok_or_else(|| OrderError::AmountOverflow("discount".into()))
}

/// Recompute subtotal and total in place; the order is untouched on error
pub fn recalculate_totals(order: &mut Order, menu: &MenuCatalog) -> Result<(), OrderError> {
    let subtotal = calculate_subtotal(&order.items, menu)?
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let total = apply_discount(subtotal, order.discount_percent)?;
    order.subtotal = to_f64(subtotal);
    order.total = to_f64(total);
    Ok(())
}

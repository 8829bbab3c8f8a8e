//! 字段归一化边界
//!
//! 远端接口的字段命名不统一 (camelCase / PascalCase，id 有时是数字)。这里的
//! DTO 通过 serde alias 全部接受，再转换成 `shared::models` 的标准结构。
//! 发往远端的请求体也在这里构造。

use super::{BookingConfirmation, FetchedOrder};
use serde::{Deserialize, Deserializer, Serialize};
use shared::models::{
    Category, DiningTable, Ingredient, InventoryTransaction, MenuItem, MenuItemSize, OrderItem,
    Recipe, RecipeIngredient, TableStatus, TransactionKind,
};

// ========== Flexible scalars ==========

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
        }
    }

    fn into_f64(self) -> Option<f64> {
        match self {
            Scalar::Str(s) => s.trim().parse().ok(),
            Scalar::Int(n) => Some(n as f64),
            Scalar::Float(n) => Some(n),
        }
    }
}

fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(Scalar::into_string)
}

fn flexible_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .filter(|s| !s.trim().is_empty()))
}

fn flexible_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .and_then(Scalar::into_f64)
        .filter(|n| n.is_finite()))
}

/// List responses come either bare or wrapped in `data` / `items`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "Data", alias = "items", alias = "Items")]
        data: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

// ========== Tables ==========

/// Map a remote status label; `None` when unrecognized
pub fn parse_table_status(raw: &str) -> Option<TableStatus> {
    let key: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match key.as_str() {
        "empty" | "available" | "free" => Some(TableStatus::Empty),
        "occupied" | "inuse" | "busy" => Some(TableStatus::Occupied),
        "reserved" | "booked" => Some(TableStatus::Reserved),
        "maintenance" | "cleaningneeded" | "cleaning" | "dirty" => Some(TableStatus::Maintenance),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTable {
    #[serde(alias = "Id", alias = "tableId", alias = "TableId", deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, alias = "Name", alias = "tableName", alias = "TableName")]
    pub name: Option<String>,
    #[serde(default, alias = "Capacity", alias = "seats", alias = "Seats")]
    pub capacity: Option<u32>,
    #[serde(default, alias = "Status")]
    pub status: Option<String>,
    #[serde(
        default,
        alias = "ZoneId",
        alias = "floorId",
        alias = "FloorId",
        deserialize_with = "flexible_opt_string"
    )]
    pub zone_id: Option<String>,
    #[serde(
        default,
        alias = "OrderId",
        deserialize_with = "flexible_opt_string"
    )]
    pub order_id: Option<String>,
}

impl From<RemoteTable> for DiningTable {
    fn from(remote: RemoteTable) -> Self {
        let status = match remote.status.as_deref() {
            None => TableStatus::Empty,
            Some(raw) => parse_table_status(raw).unwrap_or_else(|| {
                tracing::warn!(table_id = %remote.id, status = %raw, "Unknown remote table status, treating as unavailable");
                TableStatus::Maintenance
            }),
        };
        DiningTable {
            name: remote
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| remote.id.clone()),
            id: remote.id,
            capacity: remote.capacity.unwrap_or(0),
            status,
            order_id: remote.order_id,
            zone_id: remote.zone_id,
        }
    }
}

// ========== Bookings ==========

/// Booking response: `{ "donHang": { "maDonHang": ... } }`
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteBookingResponse {
    #[serde(default, rename = "donHang", alias = "DonHang")]
    pub order: Option<RemoteBookingOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteBookingOrder {
    #[serde(
        default,
        rename = "maDonHang",
        alias = "MaDonHang",
        deserialize_with = "flexible_opt_string"
    )]
    pub order_ref: Option<String>,
}

impl From<RemoteBookingResponse> for BookingConfirmation {
    fn from(remote: RemoteBookingResponse) -> Self {
        BookingConfirmation {
            booking_ref: remote.order.and_then(|o| o.order_ref),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingStatusUpdate {
    pub status_code: i32,
}

// ========== Orders ==========

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrderItem {
    #[serde(
        alias = "MenuItemId",
        alias = "dishId",
        alias = "DishId",
        deserialize_with = "flexible_string"
    )]
    pub menu_item_id: String,
    #[serde(default, alias = "SizeName", alias = "size", alias = "Size")]
    pub size_name: String,
    #[serde(default, alias = "Quantity")]
    pub quantity: u32,
    #[serde(default, alias = "Notes", alias = "note", alias = "Note")]
    pub notes: Option<String>,
}

impl From<RemoteOrderItem> for OrderItem {
    fn from(remote: RemoteOrderItem) -> Self {
        OrderItem {
            menu_item_id: remote.menu_item_id,
            size_name: remote.size_name,
            quantity: remote.quantity,
            notes: remote.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOrder {
    #[serde(alias = "Id", alias = "orderId", alias = "OrderId", deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, alias = "Items", alias = "orderItems", alias = "OrderItems")]
    pub items: Vec<RemoteOrderItem>,
}

impl From<RemoteOrder> for FetchedOrder {
    fn from(remote: RemoteOrder) -> Self {
        let order_id = remote.id;
        let items = remote
            .items
            .into_iter()
            .filter(|item| {
                if item.quantity == 0 {
                    tracing::warn!(order_id = %order_id, menu_item_id = %item.menu_item_id, "Dropping remote order line with zero quantity");
                }
                item.quantity > 0
            })
            .map(OrderItem::from)
            .collect();
        FetchedOrder { id: order_id, items }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingOrderItem<'a> {
    pub menu_item_id: &'a str,
    pub size_name: &'a str,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a OrderItem> for OutgoingOrderItem<'a> {
    fn from(item: &'a OrderItem) -> Self {
        OutgoingOrderItem {
            menu_item_id: &item.menu_item_id,
            size_name: &item.size_name,
            quantity: item.quantity,
            notes: item.notes.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingAppendItems<'a> {
    pub table_id: &'a str,
    pub items: Vec<OutgoingOrderItem<'a>>,
}

// ========== Menu ==========

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCategory {
    #[serde(alias = "Id", alias = "categoryId", alias = "CategoryId", deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "SortOrder", alias = "order", alias = "Order")]
    pub sort_order: i32,
    #[serde(default, alias = "IsActive")]
    pub is_active: Option<bool>,
}

impl From<RemoteCategory> for Category {
    fn from(remote: RemoteCategory) -> Self {
        Category {
            id: remote.id,
            name: remote.name,
            sort_order: remote.sort_order,
            is_active: remote.is_active.unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecipeLine {
    #[serde(alias = "IngredientId", deserialize_with = "flexible_string")]
    pub ingredient_id: String,
    #[serde(default, alias = "Quantity", alias = "amount", alias = "Amount", deserialize_with = "flexible_opt_f64")]
    pub quantity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSize {
    #[serde(alias = "Name", alias = "sizeName", alias = "SizeName")]
    pub name: String,
    #[serde(default, alias = "Price", deserialize_with = "flexible_opt_f64")]
    pub price: Option<f64>,
    #[serde(default, alias = "Recipe", alias = "ingredients", alias = "Ingredients")]
    pub recipe: Vec<RemoteRecipeLine>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMenuItem {
    #[serde(alias = "Id", alias = "dishId", alias = "DishId", deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "CategoryId", deserialize_with = "flexible_opt_string")]
    pub category_id: Option<String>,
    #[serde(default, alias = "Sizes")]
    pub sizes: Vec<RemoteSize>,
    #[serde(default, alias = "IsActive")]
    pub is_active: Option<bool>,
}

impl From<RemoteMenuItem> for MenuItem {
    fn from(remote: RemoteMenuItem) -> Self {
        let sizes = remote
            .sizes
            .into_iter()
            .map(|size| {
                let lines = size
                    .recipe
                    .into_iter()
                    .map(|line| RecipeIngredient::new(line.ingredient_id, line.quantity.unwrap_or(0.0)))
                    .collect();
                MenuItemSize::new(size.name, size.price.unwrap_or(0.0), Recipe::new(lines))
            })
            .collect();
        MenuItem {
            id: remote.id,
            name: remote.name,
            category_id: remote.category_id,
            sizes,
            is_active: remote.is_active.unwrap_or(true),
        }
    }
}

// ========== Inventory ==========

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteIngredient {
    #[serde(alias = "Id", alias = "ingredientId", alias = "IngredientId", deserialize_with = "flexible_string")]
    pub id: String,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "Unit")]
    pub unit: String,
    #[serde(
        default,
        alias = "Stock",
        alias = "quantity",
        alias = "Quantity",
        deserialize_with = "flexible_opt_f64"
    )]
    pub stock: Option<f64>,
    #[serde(
        default,
        alias = "MinStock",
        alias = "minimumStock",
        alias = "MinimumStock",
        deserialize_with = "flexible_opt_f64"
    )]
    pub min_stock: Option<f64>,
    #[serde(default, alias = "UnitPrice", deserialize_with = "flexible_opt_f64")]
    pub unit_price: Option<f64>,
}

impl From<RemoteIngredient> for Ingredient {
    fn from(remote: RemoteIngredient) -> Self {
        let mut stock = remote.stock.unwrap_or(0.0);
        if stock < 0.0 {
            tracing::warn!(ingredient_id = %remote.id, stock, "Negative remote stock clamped to zero");
            stock = 0.0;
        }
        Ingredient {
            id: remote.id,
            name: remote.name,
            unit: remote.unit,
            stock,
            min_stock: remote.min_stock,
            unit_price: remote.unit_price,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingTransactionLine<'a> {
    pub ingredient_id: &'a str,
    pub quantity: f64,
}

/// Stock movement as the catalog backend expects it
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingTransaction<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub items: Vec<OutgoingTransactionLine<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
    pub created_at: i64,
}

impl<'a> From<&'a InventoryTransaction> for OutgoingTransaction<'a> {
    fn from(tx: &'a InventoryTransaction) -> Self {
        let kind = match tx.kind {
            TransactionKind::In => "IN",
            TransactionKind::Adjust => "ADJUST",
            TransactionKind::Consume => "CONSUME",
        };
        OutgoingTransaction {
            id: &tx.id,
            kind,
            items: tx
                .lines
                .iter()
                .map(|l| OutgoingTransactionLine {
                    ingredient_id: &l.ingredient_id,
                    quantity: l.delta,
                })
                .collect(),
            supplier_id: tx.supplier_id.as_deref(),
            order_id: tx.order_id.as_deref(),
            note: tx.note.as_deref(),
            created_at: tx.created_at,
        }
    }
}

/// Decode a list response into canonical models
pub fn decode_list<R, T>(value: serde_json::Value) -> Result<Vec<T>, serde_json::Error>
where
    R: for<'de> Deserialize<'de>,
    T: From<R>,
{
    let envelope: ListEnvelope<R> = serde_json::from_value(value)?;
    Ok(envelope.into_vec().into_iter().map(T::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tables_accept_both_casings() {
        let tables: Vec<DiningTable> = decode_list::<RemoteTable, _>(json!([
            { "id": "T1", "name": "Table 1", "capacity": 4, "status": "Available" },
            { "Id": 2, "Name": "Table 2", "Capacity": 6, "Status": "Occupied", "ZoneId": 3 },
        ]))
        .unwrap();

        assert_eq!(tables[0].id, "T1");
        assert_eq!(tables[0].status, TableStatus::Empty);
        assert_eq!(tables[1].id, "2");
        assert_eq!(tables[1].capacity, 6);
        assert_eq!(tables[1].status, TableStatus::Occupied);
        assert_eq!(tables[1].zone_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_wrapped_list() {
        let tables: Vec<DiningTable> = decode_list::<RemoteTable, _>(json!({
            "Data": [{ "tableId": "T9", "seats": 2, "status": "CLEANING_NEEDED" }]
        }))
        .unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "T9");
        assert_eq!(tables[0].status, TableStatus::Maintenance);
    }

    #[test]
    fn test_unknown_status_is_unavailable() {
        assert_eq!(parse_table_status("in-use"), Some(TableStatus::Occupied));
        assert_eq!(parse_table_status("on fire"), None);

        let table: DiningTable = serde_json::from_value::<RemoteTable>(json!({
            "id": "T1", "capacity": 2, "status": "on fire"
        }))
        .map(Into::into)
        .unwrap();
        assert_eq!(table.status, TableStatus::Maintenance);
    }

    #[test]
    fn test_booking_reference() {
        let camel: BookingConfirmation =
            serde_json::from_value::<RemoteBookingResponse>(json!({ "donHang": { "maDonHang": "DH-42" } }))
                .unwrap()
                .into();
        assert_eq!(camel.booking_ref.as_deref(), Some("DH-42"));

        let pascal: BookingConfirmation =
            serde_json::from_value::<RemoteBookingResponse>(json!({ "DonHang": { "MaDonHang": 42 } }))
                .unwrap()
                .into();
        assert_eq!(pascal.booking_ref.as_deref(), Some("42"));

        let missing: BookingConfirmation = serde_json::from_value::<RemoteBookingResponse>(json!({}))
            .unwrap()
            .into();
        assert_eq!(missing.booking_ref, None);
    }

    #[test]
    fn test_menu_item_with_recipe() {
        let items: Vec<MenuItem> = decode_list::<RemoteMenuItem, _>(json!([{
            "Id": "pho",
            "Name": "Pho",
            "CategoryId": 1,
            "Sizes": [
                { "Name": "Small", "Price": "6.50", "Recipe": [{ "IngredientId": "noodle", "Quantity": 0.2 }] },
                { "name": "Large", "price": 8, "ingredients": [{ "ingredientId": "noodle", "amount": "0.3" }] }
            ]
        }]))
        .unwrap();

        let pho = &items[0];
        assert_eq!(pho.category_id.as_deref(), Some("1"));
        assert_eq!(pho.size("Small").unwrap().price, 6.5);
        assert_eq!(pho.size("Large").unwrap().recipe.ingredients[0].quantity, 0.3);
        assert!(pho.is_active);
    }

    #[test]
    fn test_ingredient_negative_stock_clamped() {
        let items: Vec<Ingredient> = decode_list::<RemoteIngredient, _>(json!([
            { "Id": "rice", "Name": "Rice", "Unit": "kg", "Stock": -3, "MinStock": 2 },
            { "id": "sugar", "name": "Sugar", "unit": "kg", "quantity": "3" },
        ]))
        .unwrap();
        assert_eq!(items[0].stock, 0.0);
        assert_eq!(items[0].min_stock, Some(2.0));
        assert_eq!(items[1].stock, 3.0);
    }

    #[test]
    fn test_fetched_order_drops_zero_quantity() {
        let order: FetchedOrder = serde_json::from_value::<RemoteOrder>(json!({
            "OrderId": 7,
            "OrderItems": [
                { "MenuItemId": "pho", "SizeName": "Small", "Quantity": 2 },
                { "menuItemId": "tea", "sizeName": "Cup", "quantity": 0 }
            ]
        }))
        .unwrap()
        .into();
        assert_eq!(order.id, "7");
        assert_eq!(order.items, vec![OrderItem::new("pho", "Small", 2)]);
    }

    #[test]
    fn test_outgoing_transaction_shape() {
        let tx = InventoryTransaction {
            id: "tx-1".into(),
            kind: TransactionKind::Consume,
            lines: vec![shared::models::TransactionLine {
                ingredient_id: "rice".into(),
                delta: -2.0,
                shortfall: None,
            }],
            supplier_id: None,
            order_id: Some("o-1".into()),
            created_at: 1,
            note: None,
        };
        let value = serde_json::to_value(OutgoingTransaction::from(&tx)).unwrap();
        assert_eq!(value["type"], "CONSUME");
        assert_eq!(value["items"][0]["ingredientId"], "rice");
        assert_eq!(value["orderId"], "o-1");
        assert!(value.get("supplierId").is_none());
    }
}

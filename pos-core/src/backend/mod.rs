//! 远端接口
//!
//! 两个后端以 trait 注入 ([`BookingBackend`], [`CatalogBackend`])：
//!
//! - [`HttpBackend`] - reqwest JSON 客户端
//! - [`MemoryBackend`] - 进程内实现，可注入故障，用于测试和演示
//!
//! 远端字段命名 (camelCase / PascalCase) 只在 [`normalize`] 中出现。

mod error;
pub mod http;
pub mod memory;
pub mod normalize;

pub use error::{BackendError, BackendResult};
pub use http::HttpBackend;
pub use memory::MemoryBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::models::{
    Category, DiningTable, Ingredient, InventoryTransaction, MenuItem, Order, OrderItem,
};

/// Booking request sent to the booking backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub party_size: u32,
    pub requested_time: String,
    pub table_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status_code: i32,
}

/// Result of a booking call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingConfirmation {
    /// Backend order reference, when the backend returned one
    pub booking_ref: Option<String>,
}

/// Full order as the booking backend sees it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedOrder {
    pub id: String,
    pub items: Vec<OrderItem>,
}

/// 预订 / 桌台 / 远端订单 后端
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Tables with their availability at `iso_time` for `party_size`
    async fn tables_by_time(&self, iso_time: &str, party_size: u32) -> BackendResult<Vec<DiningTable>>;

    async fn create_booking(&self, payload: &BookingPayload) -> BackendResult<BookingConfirmation>;

    async fn update_booking_status(&self, booking_id: &str, status_code: i32) -> BackendResult<()>;

    /// Append items to an existing order on the backend
    async fn append_order_items(&self, order: &Order, items: &[OrderItem]) -> BackendResult<()>;

    async fn fetch_order(&self, order_id: &str) -> BackendResult<FetchedOrder>;
}

/// 菜单 / 库存 后端
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    async fn list_categories(&self) -> BackendResult<Vec<Category>>;

    async fn list_menu_items(&self) -> BackendResult<Vec<MenuItem>>;

    async fn list_ingredients(&self) -> BackendResult<Vec<Ingredient>>;

    /// Record a stock movement remotely
    async fn push_transaction(&self, tx: &InventoryTransaction) -> BackendResult<()>;
}

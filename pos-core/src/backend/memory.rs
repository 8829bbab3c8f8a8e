//! In-process backend (同进程)
//!
//! Holds canonical data directly and records every call so tests can assert on
//! what reached the "remote" side. Failures can be switched on per backend.

use super::{
    BackendError, BackendResult, BookingBackend, BookingConfirmation, BookingPayload, CatalogBackend,
    FetchedOrder,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared::models::{
    Category, DiningTable, Ingredient, InventoryTransaction, MenuItem, Order, OrderItem,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    tables: Vec<DiningTable>,
    bookings: Vec<(String, BookingPayload)>,
    booking_statuses: HashMap<String, i32>,
    orders: HashMap<String, Vec<OrderItem>>,
    categories: Vec<Category>,
    menu_items: Vec<MenuItem>,
    ingredients: Vec<Ingredient>,
    transactions: Vec<InventoryTransaction>,
    booking_down: bool,
    catalog_down: bool,
    next_ref: u64,
}

/// In-memory implementation of both backends
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(self, tables: Vec<DiningTable>) -> Self {
        self.state.lock().tables = tables;
        self
    }

    pub fn with_menu(self, categories: Vec<Category>, items: Vec<MenuItem>) -> Self {
        {
            let mut state = self.state.lock();
            state.categories = categories;
            state.menu_items = items;
        }
        self
    }

    pub fn with_ingredients(self, ingredients: Vec<Ingredient>) -> Self {
        self.state.lock().ingredients = ingredients;
        self
    }

    /// Make every booking call fail until switched back
    pub fn set_booking_down(&self, down: bool) {
        self.state.lock().booking_down = down;
    }

    /// Make every catalog call fail until switched back
    pub fn set_catalog_down(&self, down: bool) {
        self.state.lock().catalog_down = down;
    }

    pub fn set_tables(&self, tables: Vec<DiningTable>) {
        self.state.lock().tables = tables;
    }

    /// Pretend the backend already knows an order
    pub fn seed_order(&self, order_id: &str, items: Vec<OrderItem>) {
        self.state.lock().orders.insert(order_id.to_string(), items);
    }

    pub fn bookings(&self) -> Vec<BookingPayload> {
        self.state.lock().bookings.iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn booking_status(&self, booking_ref: &str) -> Option<i32> {
        self.state.lock().booking_statuses.get(booking_ref).copied()
    }

    pub fn order_items(&self, order_id: &str) -> Option<Vec<OrderItem>> {
        self.state.lock().orders.get(order_id).cloned()
    }

    pub fn pushed_transactions(&self) -> Vec<InventoryTransaction> {
        self.state.lock().transactions.clone()
    }

    fn booking_guard(state: &MemoryState) -> BackendResult<()> {
        if state.booking_down {
            return Err(BackendError::Unavailable("booking backend down".into()));
        }
        Ok(())
    }

    fn catalog_guard(state: &MemoryState) -> BackendResult<()> {
        if state.catalog_down {
            return Err(BackendError::Unavailable("catalog backend down".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingBackend for MemoryBackend {
    async fn tables_by_time(&self, _iso_time: &str, _party_size: u32) -> BackendResult<Vec<DiningTable>> {
        let state = self.state.lock();
        Self::booking_guard(&state)?;
        Ok(state.tables.clone())
    }

    async fn create_booking(&self, payload: &BookingPayload) -> BackendResult<BookingConfirmation> {
        let mut state = self.state.lock();
        Self::booking_guard(&state)?;
        state.next_ref += 1;
        let booking_ref = format!("DH-{}", state.next_ref);
        state.bookings.push((booking_ref.clone(), payload.clone()));
        state
            .booking_statuses
            .insert(booking_ref.clone(), payload.status_code);
        Ok(BookingConfirmation {
            booking_ref: Some(booking_ref),
        })
    }

    async fn update_booking_status(&self, booking_id: &str, status_code: i32) -> BackendResult<()> {
        let mut state = self.state.lock();
        Self::booking_guard(&state)?;
        match state.booking_statuses.get_mut(booking_id) {
            Some(status) => {
                *status = status_code;
                Ok(())
            }
            None => Err(BackendError::NotFound(format!("booking {}", booking_id))),
        }
    }

    async fn append_order_items(&self, order: &Order, items: &[OrderItem]) -> BackendResult<()> {
        let mut state = self.state.lock();
        Self::booking_guard(&state)?;
        state
            .orders
            .entry(order.id.clone())
            .or_insert_with(|| order.items.clone())
            .extend(items.iter().cloned());
        Ok(())
    }

    async fn fetch_order(&self, order_id: &str) -> BackendResult<FetchedOrder> {
        let state = self.state.lock();
        Self::booking_guard(&state)?;
        state
            .orders
            .get(order_id)
            .map(|items| FetchedOrder {
                id: order_id.to_string(),
                items: items.clone(),
            })
            .ok_or_else(|| BackendError::NotFound(format!("order {}", order_id)))
    }
}

#[async_trait]
impl CatalogBackend for MemoryBackend {
    async fn list_categories(&self) -> BackendResult<Vec<Category>> {
        let state = self.state.lock();
        Self::catalog_guard(&state)?;
        Ok(state.categories.clone())
    }

    async fn list_menu_items(&self) -> BackendResult<Vec<MenuItem>> {
        let state = self.state.lock();
        Self::catalog_guard(&state)?;
        Ok(state.menu_items.clone())
    }

    async fn list_ingredients(&self) -> BackendResult<Vec<Ingredient>> {
        let state = self.state.lock();
        Self::catalog_guard(&state)?;
        Ok(state.ingredients.clone())
    }

    async fn push_transaction(&self, tx: &InventoryTransaction) -> BackendResult<()> {
        let mut state = self.state.lock();
        Self::catalog_guard(&state)?;
        state.transactions.push(tx.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BookingPayload {
        BookingPayload {
            customer_name: "Lan".into(),
            customer_phone: None,
            party_size: 2,
            requested_time: "2024-05-01T19:00:00Z".into(),
            table_ids: vec!["T2".into()],
            notes: None,
            status_code: 1,
        }
    }

    #[tokio::test]
    async fn test_booking_roundtrip() {
        let backend = MemoryBackend::new();
        let confirmation = backend.create_booking(&payload()).await.unwrap();
        let booking_ref = confirmation.booking_ref.unwrap();

        backend.update_booking_status(&booking_ref, 2).await.unwrap();
        assert_eq!(backend.booking_status(&booking_ref), Some(2));
        assert!(backend.update_booking_status("nope", 2).await.is_err());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = MemoryBackend::new();
        backend.set_booking_down(true);
        assert!(matches!(
            backend.create_booking(&payload()).await,
            Err(BackendError::Unavailable(_))
        ));
        assert!(backend.bookings().is_empty());

        // catalog side unaffected
        assert!(backend.list_ingredients().await.is_ok());
    }
}

//! redb snapshot store

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{Serialize, de::DeserializeOwned};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Category, DiningTable, InventoryTransaction, KitchenTicket, MenuItem, Order, Reservation,
};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Dining tables: key = table_id, value = JSON
const TABLES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("dining_tables");

/// Orders (open and closed): key = order_id, value = JSON
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Menu items: key = menu_item_id, value = JSON
const MENU_ITEMS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("menu_items");

/// Categories: key = category_id, value = JSON
const CATEGORIES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("categories");

/// Reservations: key = reservation_id, value = JSON
const RESERVATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("reservations");

/// Kitchen queue: key = position (0 = most recent), value = JSON
const KITCHEN_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("kitchen_tickets");

/// Inventory log: key = position in the log, value = JSON
const TRANSACTIONS_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("inventory_transactions");

/// Snapshot metadata
const META_TABLE: TableDefinition<&str, i64> = TableDefinition::new("meta");

const META_SAVED_AT: &str = "saved_at";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::Serialization(_) => AppError::with_message(ErrorCode::StorageCorrupted, message),
            _ => AppError::with_message(ErrorCode::DatabaseError, message),
        }
    }
}

/// Everything a snapshot carries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    pub tables: Vec<DiningTable>,
    pub orders: Vec<Order>,
    pub menu_items: Vec<MenuItem>,
    pub categories: Vec<Category>,
    pub reservations: Vec<Reservation>,
    /// Most recent first
    pub kitchen_tickets: Vec<KitchenTicket>,
    /// Append order
    pub transactions: Vec<InventoryTransaction>,
    /// When the snapshot was written; `None` for a fresh database
    pub saved_at: Option<i64>,
}

impl PersistedState {
    pub fn is_empty(&self) -> bool {
        self.saved_at.is_none()
    }
}

/// 快照存储
#[derive(Clone)]
pub struct SnapshotStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore").finish_non_exhaustive()
    }
}

impl SnapshotStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (tests and demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(TABLES_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(KITCHEN_TABLE)?;
            let _ = write_txn.open_table(TRANSACTIONS_TABLE)?;
            let _ = write_txn.open_table(META_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    /// Replace the stored snapshot in one transaction
    pub fn save(&self, state: &PersistedState) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        Self::replace_keyed(&txn, TABLES_TABLE, &state.tables, |t| &t.id)?;
        Self::replace_keyed(&txn, ORDERS_TABLE, &state.orders, |o| &o.id)?;
        Self::replace_keyed(&txn, MENU_ITEMS_TABLE, &state.menu_items, |i| &i.id)?;
        Self::replace_keyed(&txn, CATEGORIES_TABLE, &state.categories, |c| &c.id)?;
        Self::replace_keyed(&txn, RESERVATIONS_TABLE, &state.reservations, |r| &r.id)?;
        Self::replace_positional(&txn, KITCHEN_TABLE, &state.kitchen_tickets)?;
        Self::replace_positional(&txn, TRANSACTIONS_TABLE, &state.transactions)?;
        {
            let mut meta = txn.open_table(META_TABLE)?;
            if let Some(saved_at) = state.saved_at {
                meta.insert(META_SAVED_AT, saved_at)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Load the last snapshot; empty state when nothing was saved yet
    pub fn load(&self) -> StorageResult<PersistedState> {
        let read_txn = self.db.begin_read()?;

        let saved_at = {
            let meta = read_txn.open_table(META_TABLE)?;
            meta.get(META_SAVED_AT)?.map(|guard| guard.value())
        };

        let keyed = |def: TableDefinition<&str, &[u8]>| -> StorageResult<Vec<Vec<u8>>> {
            let table = read_txn.open_table(def)?;
            let mut rows = Vec::new();
            for result in table.iter()? {
                let (_, guard) = result?;
                rows.push(guard.value().to_vec());
            }
            Ok(rows)
        };
        let positional = |def: TableDefinition<u64, &[u8]>| -> StorageResult<Vec<Vec<u8>>> {
            let table = read_txn.open_table(def)?;
            let mut rows = Vec::new();
            for result in table.iter()? {
                let (_, guard) = result?;
                rows.push(guard.value().to_vec());
            }
            Ok(rows)
        };

        Ok(PersistedState {
            tables: decode_all(keyed(TABLES_TABLE)?)?,
            orders: decode_all(keyed(ORDERS_TABLE)?)?,
            menu_items: decode_all(keyed(MENU_ITEMS_TABLE)?)?,
            categories: decode_all(keyed(CATEGORIES_TABLE)?)?,
            reservations: decode_all(keyed(RESERVATIONS_TABLE)?)?,
            kitchen_tickets: decode_all(positional(KITCHEN_TABLE)?)?,
            transactions: decode_all(positional(TRANSACTIONS_TABLE)?)?,
            saved_at,
        })
    }

    fn replace_keyed<T: Serialize>(
        txn: &WriteTransaction,
        def: TableDefinition<&str, &[u8]>,
        rows: &[T],
        key: impl Fn(&T) -> &String,
    ) -> StorageResult<()> {
        txn.delete_table(def)?;
        let mut table = txn.open_table(def)?;
        for row in rows {
            let value = serde_json::to_vec(row)?;
            table.insert(key(row).as_str(), value.as_slice())?;
        }
        Ok(())
    }

    fn replace_positional<T: Serialize>(
        txn: &WriteTransaction,
        def: TableDefinition<u64, &[u8]>,
        rows: &[T],
    ) -> StorageResult<()> {
        txn.delete_table(def)?;
        let mut table = txn.open_table(def)?;
        for (position, row) in rows.iter().enumerate() {
            let value = serde_json::to_vec(row)?;
            table.insert(position as u64, value.as_slice())?;
        }
        Ok(())
    }
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Vec<u8>>) -> StorageResult<Vec<T>> {
    rows.iter()
        .map(|bytes| serde_json::from_slice(bytes).map_err(StorageError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{
        KitchenTicketStatus, OrderItem, ReservationStatus, TransactionKind, TransactionLine,
    };

    fn ticket(id: &str, created_at: i64) -> KitchenTicket {
        KitchenTicket {
            id: id.into(),
            order_id: "o-1".into(),
            table_name: "Window".into(),
            items: vec![],
            created_at,
            status: KitchenTicketStatus::Queued,
        }
    }

    fn tx(id: &str, delta: f64) -> InventoryTransaction {
        InventoryTransaction {
            id: id.into(),
            kind: TransactionKind::In,
            lines: vec![TransactionLine {
                ingredient_id: "sugar".into(),
                delta,
                shortfall: None,
            }],
            supplier_id: None,
            order_id: None,
            created_at: 0,
            note: None,
        }
    }

    fn sample_state() -> PersistedState {
        PersistedState {
            tables: vec![DiningTable::new("T1", "Window", 2)],
            orders: vec![Order {
                id: "o-1".into(),
                table_id: "T1".into(),
                items: vec![OrderItem::new("rice-bowl", "Regular", 2)],
                subtotal: 16.0,
                total: 16.0,
                discount_percent: 0.0,
                created_at: 1,
                closed_at: None,
                payment_method: None,
            }],
            reservations: vec![Reservation {
                id: "res-1".into(),
                table_ids: vec!["T1".into()],
                customer_name: "An".into(),
                customer_phone: None,
                party_size: 2,
                requested_time: "2024-05-01T19:00:00Z".into(),
                requested_at: 0,
                status: ReservationStatus::Booked,
                notes: None,
                backend_ref: Some("DH-1".into()),
                created_at: 0,
            }],
            // both tickets share a timestamp, order must come from position
            kitchen_tickets: vec![ticket("k2", 5), ticket("k1", 5)],
            transactions: vec![tx("tx-b", 1.0), tx("tx-a", 2.0)],
            saved_at: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_fresh_database_is_empty() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let state = store.load().unwrap();
        assert!(state.is_empty());
        assert!(state.tables.is_empty());
    }

    #[test]
    fn test_save_and_load_keeps_order() {
        let store = SnapshotStore::open_in_memory().unwrap();
        let state = sample_state();
        store.save(&state).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let store = SnapshotStore::open_in_memory().unwrap();
        store.save(&sample_state()).unwrap();

        let smaller = PersistedState {
            tables: vec![DiningTable::new("T2", "Bar", 1)],
            saved_at: Some(43),
            ..Default::default()
        };
        store.save(&smaller).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.tables.len(), 1);
        assert_eq!(loaded.tables[0].id, "T2");
        assert!(loaded.orders.is_empty());
        assert!(loaded.kitchen_tickets.is_empty());
        assert_eq!(loaded.saved_at, Some(43));
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.redb");
        {
            let store = SnapshotStore::open(&path).unwrap();
            store.save(&sample_state()).unwrap();
        }
        let reopened = SnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap().orders.len(), 1);
    }
}

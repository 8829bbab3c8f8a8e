use super::TableError;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use shared::util::prefixed_id;
use std::collections::BTreeMap;

/// 桌台登记表
///
/// Pure data holder. Rules that need orders (open-order checks) live on
/// [`crate::core::Store`].
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: BTreeMap<String, DiningTable>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted tables; later duplicates win
    pub fn from_tables(tables: Vec<DiningTable>) -> Self {
        Self {
            tables: tables.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&DiningTable> {
        self.tables.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// All tables ordered by display name
    pub fn list(&self) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> = self.tables.values().cloned().collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        tables
    }

    pub fn in_zone(&self, zone_id: &str) -> Vec<DiningTable> {
        self.list()
            .into_iter()
            .filter(|t| t.zone_id.as_deref() == Some(zone_id))
            .collect()
    }

    pub fn insert(&mut self, data: DiningTableCreate) -> Result<DiningTable, TableError> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(TableError::EmptyName);
        }
        if data.capacity == 0 {
            return Err(TableError::InvalidCapacity(data.capacity));
        }
        let id = match data.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => prefixed_id("table"),
        };
        if self.tables.contains_key(&id) {
            return Err(TableError::AlreadyExists(id));
        }

        let mut table = DiningTable::new(id.clone(), name, data.capacity);
        table.zone_id = data.zone_id;
        self.tables.insert(id, table.clone());
        Ok(table)
    }

    pub fn update(&mut self, id: &str, data: DiningTableUpdate) -> Result<DiningTable, TableError> {
        let table = self
            .tables
            .get_mut(id)
            .ok_or_else(|| TableError::NotFound(id.to_string()))?;

        // 先校验，后修改
        if data.capacity == Some(0) {
            return Err(TableError::InvalidCapacity(0));
        }
        if data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(TableError::EmptyName);
        }

        if let Some(capacity) = data.capacity {
            table.capacity = capacity;
        }
        if let Some(name) = data.name {
            table.name = name.trim().to_string();
        }
        if let Some(zone_id) = data.zone_id {
            table.zone_id = Some(zone_id).filter(|z| !z.trim().is_empty());
        }
        Ok(table.clone())
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<DiningTable> {
        self.tables.remove(id)
    }

    /// Staff override. Empty clears the order reference, anything else keeps it.
    pub fn set_status(&mut self, id: &str, status: TableStatus) -> Result<DiningTable, TableError> {
        let table = self
            .tables
            .get_mut(id)
            .ok_or_else(|| TableError::NotFound(id.to_string()))?;
        table.status = status;
        if status == TableStatus::Empty {
            table.order_id = None;
        }
        Ok(table.clone())
    }

    /// Point the table at an order and mark it occupied
    pub(crate) fn occupy(&mut self, id: &str, order_id: &str) -> Result<DiningTable, TableError> {
        let table = self
            .tables
            .get_mut(id)
            .ok_or_else(|| TableError::NotFound(id.to_string()))?;
        table.status = TableStatus::Occupied;
        table.order_id = Some(order_id.to_string());
        Ok(table.clone())
    }

    /// After checkout: cleanup state, order reference kept
    pub(crate) fn release(&mut self, id: &str, order_id: &str) -> Option<DiningTable> {
        let table = self.tables.get_mut(id)?;
        table.status = TableStatus::Maintenance;
        table.order_id = Some(order_id.to_string());
        Some(table.clone())
    }

    pub fn snapshot(&self) -> Vec<DiningTable> {
        self.tables.values().cloned().collect()
    }
}

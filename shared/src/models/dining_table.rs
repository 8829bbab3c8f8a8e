//! Dining Table Model

use serde::{Deserialize, Serialize};

/// 桌台状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    /// 空闲，可开台
    #[default]
    Empty,
    /// 用餐中
    Occupied,
    /// 已预订
    Reserved,
    /// 待清台 / 维护中
    Maintenance,
}

impl TableStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, TableStatus::Empty)
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    #[serde(default)]
    pub status: TableStatus,
    /// Active order reference, kept after close until the table is reset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Floor / zone reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
}

impl DiningTable {
    pub fn new(id: impl Into<String>, name: impl Into<String>, capacity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            capacity,
            status: TableStatus::Empty,
            order_id: None,
            zone_id: None,
        }
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub id: Option<String>,
    pub name: String,
    pub capacity: u32,
    pub zone_id: Option<String>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub capacity: Option<u32>,
    pub zone_id: Option<String>,
}

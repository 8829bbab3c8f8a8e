//! Reservation Model

use serde::{Deserialize, Serialize};

/// 预订状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ReservationStatus {
    #[default]
    Booked,
    Seated,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Only `Booked` can still transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Booked)
    }

    /// Status code understood by the booking backend
    pub fn backend_code(&self) -> i32 {
        match self {
            ReservationStatus::Booked => 1,
            ReservationStatus::Seated => 2,
            ReservationStatus::Cancelled => 3,
            ReservationStatus::NoShow => 4,
        }
    }
}

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: String,
    /// Assigned tables; empty when unassigned
    #[serde(default)]
    pub table_ids: Vec<String>,
    pub customer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub party_size: u32,
    /// Requested time as sent by the caller (ISO-8601)
    pub requested_time: String,
    /// `requested_time` parsed to Unix millis
    pub requested_at: i64,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Order reference returned by the booking backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_ref: Option<String>,
    pub created_at: i64,
}

/// Create reservation payload
///
/// Tables are resolved from `table_ids` first, then from the single `table_id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCreate {
    #[serde(default)]
    pub table_ids: Vec<String>,
    #[serde(default)]
    pub table_id: Option<String>,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub party_size: u32,
    pub requested_time: String,
    #[serde(default)]
    pub status: Option<ReservationStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReservationCreate {
    /// Candidate table ids in resolution order, deduplicated
    pub fn candidate_table_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        let source: Vec<&String> = if self.table_ids.is_empty() {
            self.table_id.iter().collect()
        } else {
            self.table_ids.iter().collect()
        };
        for id in source {
            let id = id.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }
}

//! Kitchen Ticket Model

use serde::{Deserialize, Serialize};

/// 厨房单状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenTicketStatus {
    #[default]
    Queued,
    Preparing,
    Ready,
    Served,
}

impl KitchenTicketStatus {
    /// Next status in the kitchen flow; `None` once served
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Queued => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::Served),
            Self::Served => None,
        }
    }
}

/// 厨房单菜品行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitchenTicketItem {
    pub item_name: String,
    pub size_name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// 一次送厨的记录 (KDS ticket)
///
/// Snapshot taken at dispatch time; later menu or order edits do not change it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KitchenTicket {
    pub id: String,
    pub order_id: String,
    pub table_name: String,
    pub items: Vec<KitchenTicketItem>,
    pub created_at: i64,
    #[serde(default)]
    pub status: KitchenTicketStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flow() {
        let mut status = KitchenTicketStatus::Queued;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            status = next;
            seen.push(status);
        }
        assert_eq!(
            seen,
            vec![
                KitchenTicketStatus::Queued,
                KitchenTicketStatus::Preparing,
                KitchenTicketStatus::Ready,
                KitchenTicketStatus::Served,
            ]
        );
    }
}

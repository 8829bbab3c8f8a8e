//! 可用桌台查询
//!
//! The booking backend answers which tables are free at a time; the local
//! model then removes what it knows to be unusable.

use super::ReservationBook;
use crate::tables::TableRegistry;
use shared::models::{DiningTable, TableStatus};

/// Filter the backend's table list against local state.
///
/// Keeps tables that the backend reports free, seat at least `party_size`,
/// are not in local cleanup, and are not held by a Booked reservation whose
/// slot overlaps `requested_at`.
pub fn filter_available(
    remote: Vec<DiningTable>,
    party_size: u32,
    requested_at: i64,
    slot_millis: i64,
    tables: &TableRegistry,
    reservations: &ReservationBook,
) -> Vec<DiningTable> {
    let mut available: Vec<DiningTable> = remote
        .into_iter()
        .filter(|t| t.status.is_available())
        .filter(|t| t.capacity >= party_size)
        .filter(|t| {
            tables
                .get(&t.id)
                .is_none_or(|local| local.status != TableStatus::Maintenance)
        })
        .filter(|t| {
            !reservations
                .booked_for_table(&t.id, None)
                .any(|r| (r.requested_at - requested_at).abs() < slot_millis)
        })
        .collect();
    available.sort_by(|a, b| a.capacity.cmp(&b.capacity).then_with(|| a.name.cmp(&b.name)));
    available
}

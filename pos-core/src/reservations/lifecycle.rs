//! 预订状态变更 (同步、纯内存)
//!
//! ```text
//! Booked ──confirm──▶ Seated     tables → Occupied
//!    ├────cancel────▶ Cancelled  tables → Empty
//!    └────no-show───▶ NoShow     tables → Empty
//! ```

use super::ReservationError;
use crate::core::store::Store;
use shared::models::{DiningTable, Reservation, ReservationCreate, ReservationStatus, TableStatus};
use shared::util::{parse_iso_millis, prefixed_id};

/// Validated booking request, ready for the remote call
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedReservation {
    pub table_ids: Vec<String>,
    pub requested_at: i64,
    pub status: ReservationStatus,
}

/// Outcome of checking a status change before the remote call
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Already in the target status
    Noop(Reservation),
    /// Status must change; remote update goes to `backend_ref` when present
    Apply { backend_ref: Option<String> },
}

impl Store {
    pub fn prepare_reservation(
        &self,
        request: &ReservationCreate,
    ) -> Result<PreparedReservation, ReservationError> {
        let requested_time = request.requested_time.trim();
        if requested_time.is_empty() {
            return Err(ReservationError::MissingTime);
        }
        let requested_at = parse_iso_millis(requested_time)
            .ok_or_else(|| ReservationError::InvalidTime(requested_time.to_string()))?;
        if request.party_size == 0 {
            return Err(ReservationError::InvalidPartySize);
        }

        let table_ids = request.candidate_table_ids();
        if table_ids.is_empty() {
            return Err(ReservationError::NoTableResolvable);
        }
        if let Some(missing) = table_ids.iter().find(|id| !self.tables.contains(id)) {
            return Err(ReservationError::TableNotFound(missing.clone()));
        }

        Ok(PreparedReservation {
            table_ids,
            requested_at,
            status: request.status.unwrap_or_default(),
        })
    }

    /// Record a reservation the booking backend accepted
    pub fn insert_reservation(
        &mut self,
        prepared: PreparedReservation,
        request: ReservationCreate,
        backend_ref: Option<String>,
        now: i64,
    ) -> Result<(Reservation, Vec<DiningTable>), ReservationError> {
        // 远端调用期间桌台可能被删除
        if let Some(missing) = prepared.table_ids.iter().find(|id| !self.tables.contains(id)) {
            return Err(ReservationError::TableNotFound(missing.clone()));
        }

        let mut id = prefixed_id("res");
        while self.reservations.contains(&id) {
            id = prefixed_id("res");
        }
        let reservation = Reservation {
            id,
            table_ids: prepared.table_ids,
            customer_name: request.customer_name.trim().to_string(),
            customer_phone: request.customer_phone.filter(|p| !p.trim().is_empty()),
            party_size: request.party_size,
            requested_time: request.requested_time.trim().to_string(),
            requested_at: prepared.requested_at,
            status: prepared.status,
            notes: request.notes.filter(|n| !n.trim().is_empty()),
            backend_ref,
            created_at: now,
        };
        let changed = self.apply_table_effects(&reservation);
        self.reservations.insert(reservation.clone());
        Ok((reservation, changed))
    }

    pub fn check_transition(
        &self,
        id: &str,
        target: ReservationStatus,
    ) -> Result<Transition, ReservationError> {
        let reservation = self
            .reservations
            .get(id)
            .ok_or_else(|| ReservationError::NotFound(id.to_string()))?;
        if reservation.status == target {
            return Ok(Transition::Noop(reservation.clone()));
        }
        if reservation.status.is_terminal() {
            return Err(ReservationError::Closed {
                id: id.to_string(),
                status: reservation.status,
            });
        }
        Ok(Transition::Apply {
            backend_ref: reservation.backend_ref.clone(),
        })
    }

    /// Move a Booked reservation to `target` and update its tables.
    ///
    /// Re-checks the current status, so a change made while the remote call
    /// was in flight is respected.
    pub fn apply_transition(
        &mut self,
        id: &str,
        target: ReservationStatus,
    ) -> Result<(Reservation, Vec<DiningTable>), ReservationError> {
        if let Transition::Noop(reservation) = self.check_transition(id, target)? {
            return Ok((reservation, Vec::new()));
        }
        let reservation = {
            let reservation = self
                .reservations
                .get_mut(id)
                .ok_or_else(|| ReservationError::NotFound(id.to_string()))?;
            reservation.status = target;
            reservation.clone()
        };
        let changed = self.apply_table_effects(&reservation);
        Ok((reservation, changed))
    }

    /// Table side effects of a reservation's current status; returns changed tables
    fn apply_table_effects(&mut self, reservation: &Reservation) -> Vec<DiningTable> {
        let mut changed = Vec::new();
        for table_id in &reservation.table_ids {
            let Some(table) = self.tables.get(table_id) else {
                tracing::warn!(reservation_id = %reservation.id, table_id = %table_id, "Reserved table no longer exists");
                continue;
            };
            let next = match reservation.status {
                ReservationStatus::Booked => {
                    (table.status == TableStatus::Empty).then_some(TableStatus::Reserved)
                }
                ReservationStatus::Seated => {
                    (table.status != TableStatus::Occupied).then_some(TableStatus::Occupied)
                }
                ReservationStatus::Cancelled | ReservationStatus::NoShow => {
                    // 释放为 Empty 的两个例外: 桌上有未结订单 (保持 Occupied)，
                    // 或同桌还有其它 Booked 预订 (保持 Reserved)
                    let releasable = match table.status {
                        TableStatus::Reserved => true,
                        TableStatus::Occupied => self.active_order(table_id).is_none(),
                        _ => false,
                    };
                    let still_held = self
                        .reservations
                        .booked_for_table(table_id, Some(reservation.id.as_str()))
                        .next()
                        .is_some();
                    (releasable && !still_held).then_some(TableStatus::Empty)
                }
            };
            if let Some(status) = next {
                match self.tables.set_status(table_id, status) {
                    Ok(table) => changed.push(table),
                    Err(e) => tracing::warn!(table_id = %table_id, error = %e, "Table status not updated"),
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DiningTableCreate, OrderItem};

    fn create_test_store() -> Store {
        let mut store = Store::new();
        for id in ["T1", "T2", "T3"] {
            store
                .tables
                .insert(DiningTableCreate {
                    id: Some(id.into()),
                    name: format!("Table {}", id),
                    capacity: 4,
                    zone_id: None,
                })
                .unwrap();
        }
        store
    }

    fn request(tables: &[&str]) -> ReservationCreate {
        ReservationCreate {
            table_ids: tables.iter().map(|t| t.to_string()).collect(),
            customer_name: "Minh".into(),
            customer_phone: Some("0900000000".into()),
            party_size: 4,
            requested_time: "2024-05-01T19:00:00Z".into(),
            ..Default::default()
        }
    }

    fn book(store: &mut Store, tables: &[&str]) -> Reservation {
        let req = request(tables);
        let prepared = store.prepare_reservation(&req).unwrap();
        store
            .insert_reservation(prepared, req, Some("DH-1".into()), 0)
            .unwrap()
            .0
    }

    #[test]
    fn test_prepare_validates() {
        let store = create_test_store();

        let mut req = request(&["T1"]);
        req.requested_time = " ".into();
        assert!(matches!(
            store.prepare_reservation(&req),
            Err(ReservationError::MissingTime)
        ));

        let mut req = request(&["T1"]);
        req.party_size = 0;
        assert!(matches!(
            store.prepare_reservation(&req),
            Err(ReservationError::InvalidPartySize)
        ));

        assert!(matches!(
            store.prepare_reservation(&request(&[])),
            Err(ReservationError::NoTableResolvable)
        ));
        assert!(matches!(
            store.prepare_reservation(&request(&["T1", "T9"])),
            Err(ReservationError::TableNotFound(id)) if id == "T9"
        ));
    }

    #[test]
    fn test_booking_reserves_empty_tables() {
        let mut store = create_test_store();
        store.tables.set_status("T2", TableStatus::Maintenance).unwrap();

        let reservation = book(&mut store, &["T1", "T2"]);
        assert_eq!(reservation.status, ReservationStatus::Booked);
        assert_eq!(reservation.backend_ref.as_deref(), Some("DH-1"));
        assert_eq!(store.tables.get("T1").unwrap().status, TableStatus::Reserved);
        assert_eq!(store.tables.get("T2").unwrap().status, TableStatus::Maintenance);
    }

    #[test]
    fn test_confirm_seats_all_tables() {
        let mut store = create_test_store();
        let reservation = book(&mut store, &["T1", "T2"]);

        let (seated, changed) = store
            .apply_transition(&reservation.id, ReservationStatus::Seated)
            .unwrap();
        assert_eq!(seated.status, ReservationStatus::Seated);
        assert_eq!(changed.len(), 2);
        for id in ["T1", "T2"] {
            let table = store.tables.get(id).unwrap();
            assert_eq!(table.status, TableStatus::Occupied);
            assert_eq!(table.order_id, None);
        }
    }

    #[test]
    fn test_cancel_and_no_show_release_tables() {
        let mut store = create_test_store();
        let first = book(&mut store, &["T1"]);
        let second = book(&mut store, &["T2"]);

        store
            .apply_transition(&first.id, ReservationStatus::Cancelled)
            .unwrap();
        store
            .apply_transition(&second.id, ReservationStatus::NoShow)
            .unwrap();
        assert_eq!(store.tables.get("T1").unwrap().status, TableStatus::Empty);
        assert_eq!(store.tables.get("T2").unwrap().status, TableStatus::Empty);
    }

    #[test]
    fn test_cancel_keeps_table_with_open_order() {
        let mut store = create_test_store();
        let reservation = book(&mut store, &["T1"]);
        store
            .apply_transition(&reservation.id, ReservationStatus::Seated)
            .unwrap();

        // seated table with an order: a late cancel of another booking must not free it
        let order_id = {
            store.orders.insert(shared::models::Order {
                id: "o-1".into(),
                table_id: "T1".into(),
                items: vec![OrderItem::new("rice-bowl", "Regular", 1)],
                subtotal: 0.0,
                total: 0.0,
                discount_percent: 0.0,
                created_at: 0,
                closed_at: None,
                payment_method: None,
            });
            store.tables.occupy("T1", "o-1").unwrap();
            "o-1".to_string()
        };
        let other = book(&mut store, &["T1"]);
        store
            .apply_transition(&other.id, ReservationStatus::Cancelled)
            .unwrap();

        let table = store.tables.get("T1").unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.order_id, Some(order_id));
    }

    #[test]
    fn test_cancel_keeps_table_held_by_other_booking() {
        let mut store = create_test_store();
        let first = book(&mut store, &["T3"]);
        let _second = book(&mut store, &["T3"]);

        store
            .apply_transition(&first.id, ReservationStatus::Cancelled)
            .unwrap();
        assert_eq!(store.tables.get("T3").unwrap().status, TableStatus::Reserved);
    }

    #[test]
    fn test_terminal_status_is_final() {
        let mut store = create_test_store();
        let reservation = book(&mut store, &["T1"]);
        store
            .apply_transition(&reservation.id, ReservationStatus::Cancelled)
            .unwrap();

        // same transition again is a no-op
        assert!(matches!(
            store.check_transition(&reservation.id, ReservationStatus::Cancelled),
            Ok(Transition::Noop(_))
        ));
        assert!(matches!(
            store.apply_transition(&reservation.id, ReservationStatus::Seated),
            Err(ReservationError::Closed { .. })
        ));
        assert!(matches!(
            store.check_transition("res-missing", ReservationStatus::Seated),
            Err(ReservationError::NotFound(_))
        ));
    }
}

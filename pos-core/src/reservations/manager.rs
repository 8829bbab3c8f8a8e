//! ReservationManager - 预订操作入口
//!
//! ```text
//! create / confirm / cancel / no-show
//!     ├─ 1. read lock: validate
//!     ├─ 2. remote call (no lock held), abort on failure
//!     └─ 3. write lock: re-check, mutate reservation + tables
//! ```

use super::{ReservationError, Transition, availability};
use crate::backend::{BookingBackend, BookingPayload};
use crate::core::events::{EventBus, PosEvent};
use crate::core::store::SharedStore;
use shared::models::{DiningTable, Reservation, ReservationCreate, ReservationStatus};
use shared::util::{now_millis, parse_iso_millis};
use std::sync::Arc;

/// 预订管理器
#[derive(Clone)]
pub struct ReservationManager {
    store: SharedStore,
    booking: Arc<dyn BookingBackend>,
    events: EventBus,
    slot_millis: i64,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("store", &"<SharedStore>")
            .field("booking", &"<dyn BookingBackend>")
            .field("slot_millis", &self.slot_millis)
            .finish()
    }
}

impl ReservationManager {
    pub fn new(
        store: SharedStore,
        booking: Arc<dyn BookingBackend>,
        events: EventBus,
        slot_millis: i64,
    ) -> Self {
        Self {
            store,
            booking,
            events,
            slot_millis,
        }
    }

    pub async fn create_reservation(&self, request: ReservationCreate) -> Result<Reservation, ReservationError> {
        let prepared = self.store.read().prepare_reservation(&request)?;

        let payload = BookingPayload {
            customer_name: request.customer_name.trim().to_string(),
            customer_phone: request.customer_phone.clone(),
            party_size: request.party_size,
            requested_time: request.requested_time.trim().to_string(),
            table_ids: prepared.table_ids.clone(),
            notes: request.notes.clone(),
            status_code: prepared.status.backend_code(),
        };
        let confirmation = match self.booking.create_booking(&payload).await {
            Ok(confirmation) => confirmation,
            Err(e) => {
                tracing::error!(tables = ?prepared.table_ids, error = %e, "Remote booking failed, nothing recorded");
                return Err(e.into());
            }
        };
        if confirmation.booking_ref.is_none() {
            tracing::warn!(tables = ?prepared.table_ids, "Booking accepted without an order reference");
        }

        let (reservation, tables) = self.store.write().insert_reservation(
            prepared,
            request,
            confirmation.booking_ref,
            now_millis(),
        )?;

        tracing::info!(
            reservation_id = %reservation.id,
            backend_ref = ?reservation.backend_ref,
            tables = ?reservation.table_ids,
            party_size = reservation.party_size,
            requested_time = %reservation.requested_time,
            "Reservation created"
        );
        self.publish(&reservation, &tables);
        Ok(reservation)
    }

    /// 到店入座
    pub async fn confirm_arrival(&self, id: &str) -> Result<Reservation, ReservationError> {
        self.transition(id, ReservationStatus::Seated).await
    }

    pub async fn cancel_reservation(&self, id: &str) -> Result<Reservation, ReservationError> {
        self.transition(id, ReservationStatus::Cancelled).await
    }

    pub async fn mark_no_show(&self, id: &str) -> Result<Reservation, ReservationError> {
        self.transition(id, ReservationStatus::NoShow).await
    }

    async fn transition(&self, id: &str, target: ReservationStatus) -> Result<Reservation, ReservationError> {
        let check = self.store.read().check_transition(id, target)?;
        let backend_ref = match check {
            Transition::Noop(reservation) => {
                tracing::debug!(reservation_id = %id, status = ?target, "Reservation already in target status");
                return Ok(reservation);
            }
            Transition::Apply { backend_ref } => backend_ref,
        };

        match backend_ref {
            Some(backend_ref) => {
                if let Err(e) = self
                    .booking
                    .update_booking_status(&backend_ref, target.backend_code())
                    .await
                {
                    tracing::error!(reservation_id = %id, backend_ref = %backend_ref, status = ?target, error = %e, "Remote status update failed, reservation unchanged");
                    return Err(e.into());
                }
            }
            None => {
                tracing::warn!(reservation_id = %id, status = ?target, "Reservation has no backend reference, updating locally only");
            }
        }

        let (reservation, tables) = self.store.write().apply_transition(id, target)?;
        tracing::info!(
            reservation_id = %id,
            status = ?reservation.status,
            tables_changed = tables.len(),
            "Reservation status changed"
        );
        self.publish(&reservation, &tables);
        Ok(reservation)
    }

    /// Tables free at `date_time` for `party_size`. Never fails: errors are
    /// logged and produce an empty list.
    pub async fn get_available_tables(&self, date_time: &str, party_size: u32) -> Vec<DiningTable> {
        let Some(requested_at) = parse_iso_millis(date_time) else {
            tracing::warn!(date_time = %date_time, "Availability query with unparseable time");
            return Vec::new();
        };
        if party_size == 0 {
            tracing::warn!("Availability query with party size 0");
            return Vec::new();
        }

        let remote = match self.booking.tables_by_time(date_time.trim(), party_size).await {
            Ok(tables) => tables,
            Err(e) => {
                tracing::warn!(date_time = %date_time, party_size, error = %e, "Availability lookup failed");
                return Vec::new();
            }
        };

        let store = self.store.read();
        let available = availability::filter_available(
            remote,
            party_size,
            requested_at,
            self.slot_millis,
            &store.tables,
            &store.reservations,
        );
        tracing::debug!(date_time = %date_time, party_size, count = available.len(), "Availability computed");
        available
    }

    pub fn get_reservation(&self, id: &str) -> Option<Reservation> {
        self.store.read().reservations.get(id).cloned()
    }

    pub fn list_reservations(&self) -> Vec<Reservation> {
        self.store.read().reservations.list()
    }

    fn publish(&self, reservation: &Reservation, tables: &[DiningTable]) {
        for table in tables {
            self.events.table_changed(table);
        }
        self.events
            .publish(PosEvent::ReservationChanged(reservation.clone()));
    }
}

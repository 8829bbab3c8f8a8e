use shared::models::{Reservation, ReservationStatus};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// 预订存储
#[derive(Debug, Clone, Default)]
pub struct ReservationBook {
    reservations: HashMap<String, Reservation>,
}

impl ReservationBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reservations(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: reservations.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Reservation> {
        self.reservations.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Reservation> {
        self.reservations.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.reservations.contains_key(id)
    }

    /// Add a new reservation. An existing id is never overwritten; returns
    /// `false` in that case.
    pub(crate) fn insert(&mut self, reservation: Reservation) -> bool {
        match self.reservations.entry(reservation.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(reservation);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Ordered by requested time
    pub fn list(&self) -> Vec<Reservation> {
        let mut list: Vec<Reservation> = self.reservations.values().cloned().collect();
        list.sort_by(|a, b| {
            a.requested_at
                .cmp(&b.requested_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }

    /// Booked reservations that include `table_id`, except `exclude_id`
    pub fn booked_for_table<'a>(
        &'a self,
        table_id: &'a str,
        exclude_id: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Reservation> + 'a {
        self.reservations.values().filter(move |r| {
            r.status == ReservationStatus::Booked
                && Some(r.id.as_str()) != exclude_id
                && r.table_ids.iter().any(|t| t == table_id)
        })
    }

    pub fn snapshot(&self) -> Vec<Reservation> {
        self.reservations.values().cloned().collect()
    }
}

use super::KitchenError;
use shared::models::KitchenTicket;
use std::collections::VecDeque;

/// 厨房单队列，最新在前
#[derive(Debug, Clone, Default)]
pub struct KitchenQueue {
    tickets: VecDeque<KitchenTicket>,
}

impl KitchenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tickets(tickets: Vec<KitchenTicket>) -> Self {
        Self {
            tickets: tickets.into(),
        }
    }

    pub(crate) fn push_front(&mut self, ticket: KitchenTicket) {
        self.tickets.push_front(ticket);
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&KitchenTicket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Most recent first
    pub fn list(&self) -> Vec<KitchenTicket> {
        self.tickets.iter().cloned().collect()
    }

    /// Queued → Preparing → Ready → Served
    pub fn advance(&mut self, id: &str) -> Result<KitchenTicket, KitchenError> {
        let ticket = self
            .tickets
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| KitchenError::TicketNotFound(id.to_string()))?;
        let next = ticket
            .status
            .next()
            .ok_or_else(|| KitchenError::TicketAlreadyServed(id.to_string()))?;
        ticket.status = next;
        Ok(ticket.clone())
    }
}

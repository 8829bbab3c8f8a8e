use crate::inventory::InventoryError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Kitchen dispatch errors
#[derive(Debug, Error)]
pub enum KitchenError {
    #[error("Order already closed: {0}")]
    OrderClosed(String),

    #[error("Order has no items: {0}")]
    EmptyOrder(String),

    #[error("Kitchen ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Kitchen ticket already served: {0}")]
    TicketAlreadyServed(String),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl From<KitchenError> for AppError {
    fn from(err: KitchenError) -> Self {
        let message = err.to_string();
        match err {
            KitchenError::OrderClosed(id) => AppError::with_message(ErrorCode::OrderAlreadyClosed, message)
                .with_detail("order_id", id),
            KitchenError::EmptyOrder(id) => {
                AppError::with_message(ErrorCode::OrderEmpty, message).with_detail("order_id", id)
            }
            KitchenError::TicketNotFound(id) => {
                AppError::with_message(ErrorCode::TicketNotFound, message).with_detail("ticket_id", id)
            }
            KitchenError::TicketAlreadyServed(id) => {
                AppError::with_message(ErrorCode::TicketAlreadyServed, message)
                    .with_detail("ticket_id", id)
            }
            KitchenError::Inventory(e) => e.into(),
        }
    }
}

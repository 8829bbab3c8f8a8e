use crate::backend::BackendError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Order lifecycle errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table {table_id} already has open order {order_id}")]
    TableOccupied { table_id: String, order_id: String },

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Order already closed: {0}")]
    AlreadyClosed(String),

    #[error("No active order on table {0}")]
    NoActiveOrder(String),

    #[error("Order must contain at least one item")]
    EmptyItems,

    #[error("Invalid quantity {quantity} for {menu_item_id}")]
    InvalidQuantity { menu_item_id: String, quantity: u32 },

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(String),

    #[error("Size {size_name} not found on {menu_item_id}")]
    SizeNotFound {
        menu_item_id: String,
        size_name: String,
    },

    #[error("Discount must be between 0 and 100, got {0}")]
    InvalidDiscount(f64),

    #[error("Price {price} of {menu_item_id}/{size_name} is out of range")]
    PriceOutOfRange {
        menu_item_id: String,
        size_name: String,
        price: f64,
    },

    #[error("Order amount overflows at {0}")]
    AmountOverflow(String),

    #[error("Payment method is required")]
    MissingPaymentMethod,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let message = err.to_string();
        match err {
            OrderError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            OrderError::TableOccupied { table_id, order_id } => {
                AppError::with_message(ErrorCode::TableOccupied, message)
                    .with_detail("table_id", table_id)
                    .with_detail("order_id", order_id)
            }
            OrderError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, message).with_detail("order_id", id)
            }
            OrderError::AlreadyClosed(id) => AppError::with_message(ErrorCode::OrderAlreadyClosed, message)
                .with_detail("order_id", id),
            OrderError::NoActiveOrder(table_id) => {
                AppError::with_message(ErrorCode::NoActiveOrder, message).with_detail("table_id", table_id)
            }
            OrderError::EmptyItems => AppError::with_message(ErrorCode::OrderEmpty, message),
            OrderError::InvalidQuantity { menu_item_id, quantity } => {
                AppError::with_message(ErrorCode::InvalidQuantity, message)
                    .with_detail("menu_item_id", menu_item_id)
                    .with_detail("quantity", quantity)
            }
            OrderError::MenuItemNotFound(id) => AppError::with_message(ErrorCode::MenuItemNotFound, message)
                .with_detail("menu_item_id", id),
            OrderError::SizeNotFound { menu_item_id, size_name } => {
                AppError::with_message(ErrorCode::SizeNotFound, message)
                    .with_detail("menu_item_id", menu_item_id)
                    .with_detail("size_name", size_name)
            }
            OrderError::InvalidDiscount(_) => AppError::with_message(ErrorCode::InvalidDiscount, message),
            OrderError::PriceOutOfRange {
                menu_item_id,
                size_name,
                price,
            } => AppError::with_message(ErrorCode::AmountOutOfRange, message)
                .with_detail("menu_item_id", menu_item_id)
                .with_detail("size_name", size_name)
                .with_detail("price", price),
            OrderError::AmountOverflow(at) => {
                AppError::with_message(ErrorCode::AmountOutOfRange, message).with_detail("at", at)
            }
            OrderError::MissingPaymentMethod => {
                AppError::with_message(ErrorCode::PaymentInvalidMethod, message)
            }
            OrderError::Backend(e) => e.into(),
        }
    }
}

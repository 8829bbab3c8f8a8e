use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Table registry errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Table already exists: {0}")]
    AlreadyExists(String),

    #[error("Table name is required")]
    EmptyName,

    #[error("Invalid table capacity: {0}")]
    InvalidCapacity(u32),

    #[error("Table {table_id} still holds open order {order_id}")]
    HasOpenOrder { table_id: String, order_id: String },
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        let message = err.to_string();
        match err {
            TableError::NotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            TableError::AlreadyExists(id) => AppError::with_message(ErrorCode::TableAlreadyExists, message)
                .with_detail("table_id", id),
            TableError::EmptyName => AppError::required("name"),
            TableError::InvalidCapacity(capacity) => {
                AppError::with_message(ErrorCode::TableInvalidCapacity, message)
                    .with_detail("capacity", capacity)
            }
            TableError::HasOpenOrder { table_id, order_id } => {
                AppError::with_message(ErrorCode::TableHasOrders, message)
                    .with_detail("table_id", table_id)
                    .with_detail("order_id", order_id)
            }
        }
    }
}

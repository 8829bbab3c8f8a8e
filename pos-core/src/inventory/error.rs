use crate::backend::BackendError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Inventory ledger errors
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("No stock lines given")]
    EmptyItems,

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Invalid quantity {quantity} for ingredient {ingredient_id}")]
    InvalidQuantity { ingredient_id: String, quantity: f64 },

    #[error("Insufficient stock for {ingredient_id}: requested {requested}, available {available}")]
    InsufficientStock {
        ingredient_id: String,
        requested: f64,
        available: f64,
    },

    #[error("Quantity of {0} overflows")]
    QuantityOverflow(String),

    #[error("Stock of {ingredient_id} would reach {stock}, above the supported maximum")]
    StockOutOfRange { ingredient_id: String, stock: f64 },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        let message = err.to_string();
        match err {
            InventoryError::EmptyItems => AppError::with_message(ErrorCode::RequiredField, message)
                .with_detail("field", "items"),
            InventoryError::IngredientNotFound(id) => {
                AppError::with_message(ErrorCode::IngredientNotFound, message)
                    .with_detail("ingredient_id", id)
            }
            InventoryError::InvalidQuantity { ingredient_id, quantity } => {
                AppError::with_message(ErrorCode::InvalidStockQuantity, message)
                    .with_detail("ingredient_id", ingredient_id)
                    .with_detail("quantity", quantity)
            }
            InventoryError::InsufficientStock {
                ingredient_id,
                requested,
                available,
            } => AppError::with_message(ErrorCode::InsufficientStock, message)
                .with_detail("ingredient_id", ingredient_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            InventoryError::QuantityOverflow(id) => {
                AppError::with_message(ErrorCode::StockOutOfRange, message).with_detail("ingredient_id", id)
            }
            InventoryError::StockOutOfRange { ingredient_id, stock } => {
                AppError::with_message(ErrorCode::StockOutOfRange, message)
                    .with_detail("ingredient_id", ingredient_id)
                    .with_detail("stock", stock)
            }
            InventoryError::Backend(e) => e.into(),
        }
    }
}

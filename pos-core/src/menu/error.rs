use shared::error::{AppError, ErrorCode};
use shared::models::MenuValidationError;
use thiserror::Error;

/// Menu catalog errors
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] MenuValidationError),
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        let message = err.to_string();
        match err {
            MenuError::NotFound(id) => AppError::with_message(ErrorCode::MenuItemNotFound, message)
                .with_detail("menu_item_id", id),
            MenuError::Invalid(invalid) => {
                let code = match &invalid {
                    MenuValidationError::NoSizes(_) => ErrorCode::ValidationFailed,
                    MenuValidationError::EmptySizeName(_) => ErrorCode::RequiredField,
                    MenuValidationError::DuplicateSize { .. } => ErrorCode::SizeNameExists,
                    MenuValidationError::InvalidPrice { .. } => ErrorCode::MenuItemInvalidPrice,
                    MenuValidationError::EmptyRecipe { .. } => ErrorCode::RecipeEmpty,
                    MenuValidationError::InvalidRecipeQuantity { .. } => {
                        ErrorCode::RecipeInvalidQuantity
                    }
                };
                AppError::with_message(code, message)
            }
        }
    }
}

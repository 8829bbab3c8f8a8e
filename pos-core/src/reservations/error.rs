use crate::backend::BackendError;
use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;
use thiserror::Error;

/// Reservation errors
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("Reservation not found: {0}")]
    NotFound(String),

    #[error("Reservation {id} is already {status:?}")]
    Closed {
        id: String,
        status: ReservationStatus,
    },

    #[error("Requested time is required")]
    MissingTime,

    #[error("Invalid requested time: {0}")]
    InvalidTime(String),

    #[error("Party size must be positive")]
    InvalidPartySize,

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("No table could be resolved for the reservation")]
    NoTableResolvable,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<ReservationError> for AppError {
    fn from(err: ReservationError) -> Self {
        let message = err.to_string();
        match err {
            ReservationError::NotFound(id) => {
                AppError::with_message(ErrorCode::ReservationNotFound, message)
                    .with_detail("reservation_id", id)
            }
            ReservationError::Closed { id, status } => {
                AppError::with_message(ErrorCode::ReservationClosed, message)
                    .with_detail("reservation_id", id)
                    .with_detail("status", format!("{:?}", status))
            }
            ReservationError::MissingTime => AppError::with_message(ErrorCode::RequiredField, message)
                .with_detail("field", "requested_time"),
            ReservationError::InvalidTime(raw) => {
                AppError::with_message(ErrorCode::ValidationFailed, message)
                    .with_detail("requested_time", raw)
            }
            ReservationError::InvalidPartySize => {
                AppError::with_message(ErrorCode::ValueOutOfRange, message)
                    .with_detail("field", "party_size")
            }
            ReservationError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, message).with_detail("table_id", id)
            }
            ReservationError::NoTableResolvable => {
                AppError::with_message(ErrorCode::NoTableResolvable, message)
            }
            ReservationError::Backend(e) => e.into(),
        }
    }
}

//! Unified error system for the POS core
//!
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu / inventory errors
//! - 7xxx: Table / reservation errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, NoticeTone};
//!
//! let err = AppError::new(ErrorCode::TableOccupied);
//! assert_eq!(err.tone(), NoticeTone::Warning);
//!
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "party_size must be positive")
//!     .with_detail("field", "party_size");
//! assert_eq!(err.code.code(), 2);
//! ```

mod category;
mod codes;
mod types;

pub use category::{ErrorCategory, NoticeTone};
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};

//! Shared types for the restaurant POS core
//!
//! Domain models, the unified error type and small utilities used by
//! `pos-core` and by any caller that talks to it.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode, NoticeTone};
pub use serde::{Deserialize, Serialize};

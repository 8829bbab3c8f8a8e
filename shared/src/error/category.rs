//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Order errors
/// - 5xxx: Payment errors
/// - 6xxx: Menu / inventory errors
/// - 7xxx: Table / reservation errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Order errors (4xxx)
    Order,
    /// Payment errors (5xxx)
    Payment,
    /// Menu and inventory errors (6xxx)
    Inventory,
    /// Table and reservation errors (7xxx)
    Table,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Inventory,
            7000..8000 => Self::Table,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Inventory => "inventory",
            Self::Table => "table",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

/// 通知语气 (UI toast 用)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTone {
    Error,
    Warning,
    Info,
    Success,
}

impl ErrorCode {
    /// Tone the UI should use when surfacing this code
    ///
    /// Validation and business-rule rejections are warnings (the user can fix
    /// the input); system and storage failures are errors.
    pub fn tone(&self) -> NoticeTone {
        match self.category() {
            _ if self.is_success() => NoticeTone::Success,
            ErrorCategory::System => NoticeTone::Error,
            ErrorCategory::General => NoticeTone::Warning,
            _ => match self {
                ErrorCode::ReservationClosed | ErrorCode::OrderAlreadyClosed => NoticeTone::Info,
                _ => NoticeTone::Warning,
            },
        }
    }
}

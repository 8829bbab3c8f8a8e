//! Unified error codes for the POS core
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Menu / inventory errors
//! - 7xxx: Table / reservation errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been closed
    OrderAlreadyClosed = 4003,
    /// Order is empty
    OrderEmpty = 4007,
    /// Table has no open order
    NoActiveOrder = 4008,
    /// Order item quantity is invalid
    InvalidQuantity = 4009,
    /// Discount percent outside 0..=100
    InvalidDiscount = 4010,
    /// Price or amount outside the supported range
    AmountOutOfRange = 4011,

    // ==================== 5xxx: Payment ====================
    /// Invalid payment method
    PaymentInvalidMethod = 5003,

    // ==================== 6xxx: Menu / Inventory ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu item has invalid price
    MenuItemInvalidPrice = 6002,
    /// Size not found on the menu item
    SizeNotFound = 6201,
    /// Size name duplicated on one menu item
    SizeNameExists = 6202,
    /// Recipe has no ingredient lines
    RecipeEmpty = 6203,
    /// Recipe line quantity must be positive and bounded
    RecipeInvalidQuantity = 6204,
    /// Ingredient not found
    IngredientNotFound = 6301,
    /// Stock would not cover the requested consumption
    InsufficientStock = 6302,
    /// Stock movement quantity is invalid
    InvalidStockQuantity = 6303,
    /// Stock level would leave the supported range
    StockOutOfRange = 6304,
    /// Kitchen ticket not found
    TicketNotFound = 6401,
    /// Kitchen ticket already served
    TicketAlreadyServed = 6402,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is occupied
    TableOccupied = 7002,
    /// Table capacity must be positive
    TableInvalidCapacity = 7005,
    /// Table id already exists
    TableAlreadyExists = 7006,
    /// Table has active orders
    TableHasOrders = 7104,
    /// Reservation not found
    ReservationNotFound = 7201,
    /// Reservation already in a terminal status
    ReservationClosed = 7202,
    /// No table could be resolved for the reservation
    NoTableResolvable = 7203,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Network error
    NetworkError = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Remote backend rejected the call
    BackendRejected = 9006,

    // ==================== 94xx: Storage ====================
    /// Storage corrupted (data file damaged)
    StorageCorrupted = 9403,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyClosed => "Order has already been closed",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::NoActiveOrder => "Table has no open order",
            ErrorCode::InvalidQuantity => "Quantity must be positive",
            ErrorCode::InvalidDiscount => "Discount must be between 0 and 100",
            ErrorCode::AmountOutOfRange => "Amount is out of range",

            // Payment
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Menu / Inventory
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemInvalidPrice => "Menu item has invalid price",
            ErrorCode::SizeNotFound => "Size not found",
            ErrorCode::SizeNameExists => "Size name already exists",
            ErrorCode::RecipeEmpty => "Recipe has no ingredients",
            ErrorCode::RecipeInvalidQuantity => "Recipe quantity must be positive",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::InsufficientStock => "Insufficient stock",
            ErrorCode::InvalidStockQuantity => "Invalid stock quantity",
            ErrorCode::StockOutOfRange => "Stock level out of range",
            ErrorCode::TicketNotFound => "Kitchen ticket not found",
            ErrorCode::TicketAlreadyServed => "Kitchen ticket already served",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableInvalidCapacity => "Table capacity must be positive",
            ErrorCode::TableAlreadyExists => "Table already exists",
            ErrorCode::TableHasOrders => "Table has active orders",
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationClosed => "Reservation is no longer active",
            ErrorCode::NoTableResolvable => "No table could be resolved",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::BackendRejected => "Remote backend rejected the request",

            // Storage
            ErrorCode::StorageCorrupted => "Storage corrupted (data file damaged)",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4003 => Ok(ErrorCode::OrderAlreadyClosed),
            4007 => Ok(ErrorCode::OrderEmpty),
            4008 => Ok(ErrorCode::NoActiveOrder),
            4009 => Ok(ErrorCode::InvalidQuantity),
            4010 => Ok(ErrorCode::InvalidDiscount),
            4011 => Ok(ErrorCode::AmountOutOfRange),

            // Payment
            5003 => Ok(ErrorCode::PaymentInvalidMethod),

            // Menu / Inventory
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuItemInvalidPrice),
            6201 => Ok(ErrorCode::SizeNotFound),
            6202 => Ok(ErrorCode::SizeNameExists),
            6203 => Ok(ErrorCode::RecipeEmpty),
            6204 => Ok(ErrorCode::RecipeInvalidQuantity),
            6301 => Ok(ErrorCode::IngredientNotFound),
            6302 => Ok(ErrorCode::InsufficientStock),
            6303 => Ok(ErrorCode::InvalidStockQuantity),
            6304 => Ok(ErrorCode::StockOutOfRange),
            6401 => Ok(ErrorCode::TicketNotFound),
            6402 => Ok(ErrorCode::TicketAlreadyServed),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7005 => Ok(ErrorCode::TableInvalidCapacity),
            7006 => Ok(ErrorCode::TableAlreadyExists),
            7104 => Ok(ErrorCode::TableHasOrders),
            7201 => Ok(ErrorCode::ReservationNotFound),
            7202 => Ok(ErrorCode::ReservationClosed),
            7203 => Ok(ErrorCode::NoTableResolvable),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9006 => Ok(ErrorCode::BackendRejected),
            9403 => Ok(ErrorCode::StorageCorrupted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

//! Entity validation errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when an entity invariant would be violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Name is empty after trimming.
    #[error("Name must not be empty")]
    EmptyName,

    /// Quantity amount is zero or negative.
    #[error("Quantity must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Quantity amount could not be parsed.
    #[error("Invalid quantity amount: {0:?}")]
    InvalidAmount(String),

    /// Category is already part of a store's category order.
    #[error("Category {0} appears more than once in the category order")]
    DuplicateCategory(Uuid),

    /// Position is outside of the category order.
    #[error("Position {position} is out of range for {len} categories")]
    PositionOutOfRange { position: usize, len: usize },

    /// Unknown store type name.
    #[error("Unknown store type: {0}")]
    UnknownStoreType(String),
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;

/// Trims a user supplied name, rejecting it when nothing is left.
pub(crate) fn normalize_name(name: impl Into<String>) -> EntityResult<String> {
    let name = name.into();
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EntityError::EmptyName);
    }
    Ok(trimmed.to_string())
}

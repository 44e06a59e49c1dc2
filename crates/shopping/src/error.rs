//! Service error types.

use entities::EntityError;
use shop_store::ShopStoreError;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by [`ShoppingService`](crate::ShoppingService).
#[derive(Debug, Error)]
pub enum ShoppingError {
    /// Storage failure.
    #[error(transparent)]
    Store(#[from] ShopStoreError),

    /// Input rejected by entity validation.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Referenced entity does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    /// Product is not on the list.
    #[error("Product {product_id} is not on list {list_id}")]
    NotInList { list_id: Uuid, product_id: Uuid },
}

impl ShoppingError {
    /// Creates a not found error.
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }
}

/// Result type for service operations.
pub type ShoppingResult<T> = Result<T, ShoppingError>;

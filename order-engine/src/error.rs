//! Store error taxonomy
//!
//! All variants are recoverable at the call site; the store never partially
//! applies a rejected mutation.

use shared::order::OrderStatus;
use thiserror::Error;

/// Store errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Delivery assignment required to assign order: {0}")]
    MissingAssignment(String),

    #[error("Another mutation is in flight for order: {0}")]
    ConcurrentModification(String),

    #[error("Item {product_id} not found on order {order_id}")]
    ItemNotFound {
        order_id: String,
        product_id: String,
    },

    #[error("Cannot accept order without items: {0}")]
    EmptyOrder(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

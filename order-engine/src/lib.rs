//! Order Lifecycle Engine
//!
//! Owns the authoritative order collection and everything built on it:
//!
//! - **store**: command processing over the order collection
//! - **query**: read-only projections for the dashboard screens
//! - **money**: decimal-precision amount computation and validation
//! - **error**: the recoverable store error taxonomy
//!
//! # Architecture
//!
//! ```text
//! Command → OrderStore → state machine validation → mutation + timeline
//!                ↓
//!            Broadcast → all subscribers (UI re-render)
//!
//! Query  → OrderStore (read lock) → snapshot projection
//! ```
//!
//! The state machine ([`shared::order::OrderStatus`]) holds no order data
//! and has no dependency on the store; the store delegates every legality
//! check to it.

pub mod error;
pub mod money;
pub mod query;
pub mod store;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use query::OrderStats;
pub use store::{OrderStore, StoreConfig};

// Re-export shared types for convenience
pub use shared::order::{
    AssignmentInput, CustomerInfo, DeliveryAssignment, Order, OrderAction, OrderDraft, OrderItem,
    OrderItemDraft, OrderStatus, OrderTimelineEvent, OrderUpdate, PaymentStatus, TimelineActor,
    TransitionContext, available_actions,
};

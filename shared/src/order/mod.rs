//! Order Lifecycle Module
//!
//! This module provides the types of the order lifecycle model:
//! - Status: the state machine over order statuses and derived actions
//! - Events: immutable timeline records with actor attribution
//! - Record: the Order entity itself
//! - Types: items, customer, delivery assignment, payment status, commands

pub mod event;
pub mod record;
pub mod status;
pub mod types;

// Re-exports
pub use event::{OrderTimelineEvent, OrderUpdate, TimelineActor, TransitionNarrative, transition_narrative};
pub use record::Order;
pub use status::{OrderAction, OrderStatus, available_actions};
pub use types::{
    AssignmentInput, CustomerInfo, DeliveryAssignment, OrderDraft, OrderItem, OrderItemDraft,
    PaymentStatus, TransitionContext,
};

//! Order record - the central entity of the lifecycle model
//!
//! An order is created once (status `New`, one synthetic timeline event),
//! mutated only through the store's command operations, and never deleted -
//! terminal orders remain as historical records.

use super::event::OrderTimelineEvent;
use super::status::OrderStatus;
use super::types::{CustomerInfo, DeliveryAssignment, OrderItem, PaymentStatus};
use serde::{Deserialize, Serialize};

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Stable internal ID
    pub id: String,
    /// Human-facing order code (distinct generation scheme from `id`)
    pub code: String,
    /// Fulfillment status
    pub status: OrderStatus,
    /// Line items
    pub items: Vec<OrderItem>,
    /// Customer reference data, copied at creation
    pub customer: CustomerInfo,
    /// Total charge
    pub payment_amount: f64,
    /// Payment lifecycle, orthogonal to `status`
    pub payment_status: PaymentStatus,
    /// Present only once the order reaches `Assigned`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_assignment: Option<DeliveryAssignment>,
    /// Append-only audit timeline, chronological
    pub timeline: Vec<OrderTimelineEvent>,
    /// Present only when the order is `Cancelled`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Bumped on every accepted mutation
    pub updated_at: i64,
}

impl Order {
    /// Create a new order in `New` status with its synthetic creation event.
    pub fn new(
        id: String,
        code: String,
        customer: CustomerInfo,
        items: Vec<OrderItem>,
        payment_amount: f64,
        payment_status: PaymentStatus,
    ) -> Self {
        let creation = OrderTimelineEvent::creation();
        let now = creation.timestamp;
        Self {
            id,
            code,
            status: OrderStatus::New,
            items,
            customer,
            payment_amount,
            payment_status,
            delivery_assignment: None,
            timeline: vec![creation],
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// True once the order admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Not yet handed to delivery and not terminal.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::New | OrderStatus::Accepted | OrderStatus::Preparing | OrderStatus::Ready
        )
    }

    /// Handed to delivery but not yet delivered.
    pub fn is_active_delivery(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Assigned | OrderStatus::OutForDelivery
        )
    }

    /// The timeline invariant: at least one event, tail matching `status`.
    pub fn timeline_consistent(&self) -> bool {
        self.timeline
            .last()
            .is_some_and(|event| event.status == self.status)
    }

    /// Item lookup by product id.
    pub fn item(&self, product_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    /// All items packed (trivially false for an empty order).
    pub fn fully_packed(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.packed)
    }
}

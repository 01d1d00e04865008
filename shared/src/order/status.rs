//! Order status state machine
//!
//! The transition table in [`OrderStatus::valid_transitions`] is the single
//! source of truth for order lifecycle legality. Everything else here —
//! `can_transition_to`, `is_terminal`, [`available_actions`] — is derived
//! from that table, never maintained in parallel.

use serde::{Deserialize, Serialize};

/// Order fulfillment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Just placed, awaiting seller response
    #[default]
    New,
    /// Seller accepted the order
    Accepted,
    /// Kitchen/packing in progress
    Preparing,
    /// Packed and ready for pickup by delivery
    Ready,
    /// Delivery person assigned
    Assigned,
    /// Handed over, en route to customer
    OutForDelivery,
    /// Delivered to customer (terminal)
    Delivered,
    /// Cancelled before delivery (terminal)
    Cancelled,
    /// Declined by seller from New (terminal)
    Declined,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [OrderStatus; 9] = [
        OrderStatus::New,
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Assigned,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Declined,
    ];

    /// The authoritative transition table.
    ///
    /// Terminal statuses return an empty slice rather than being
    /// special-cased, so `is_terminal` stays a derived property.
    pub fn valid_transitions(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            New => &[Accepted, Declined, Cancelled],
            Accepted => &[Preparing, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[Assigned, Cancelled],
            Assigned => &[OutForDelivery, Cancelled],
            OutForDelivery => &[Delivered],
            Delivered | Cancelled | Declined => &[],
        }
    }

    /// True iff `to` is a legal next status from `self`.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }

    /// Display label for dashboard chips
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::OutForDelivery => "Out for delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Declined => "Declined",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User-facing commands the dashboard can issue against an order.
///
/// Each action targets exactly one status; the set offered for a given
/// status is derived from the transition table via [`available_actions`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderAction {
    Accept,
    Decline,
    StartPreparing,
    MarkReady,
    AssignDelivery,
    StartDelivery,
    MarkDelivered,
    Cancel,
}

impl OrderAction {
    /// The status this action moves an order into.
    pub fn target(self) -> OrderStatus {
        match self {
            OrderAction::Accept => OrderStatus::Accepted,
            OrderAction::Decline => OrderStatus::Declined,
            OrderAction::StartPreparing => OrderStatus::Preparing,
            OrderAction::MarkReady => OrderStatus::Ready,
            OrderAction::AssignDelivery => OrderStatus::Assigned,
            OrderAction::StartDelivery => OrderStatus::OutForDelivery,
            OrderAction::MarkDelivered => OrderStatus::Delivered,
            OrderAction::Cancel => OrderStatus::Cancelled,
        }
    }

    /// Inverse of [`OrderAction::target`]. `New` is never a target.
    pub fn for_target(to: OrderStatus) -> Option<OrderAction> {
        match to {
            OrderStatus::New => None,
            OrderStatus::Accepted => Some(OrderAction::Accept),
            OrderStatus::Declined => Some(OrderAction::Decline),
            OrderStatus::Preparing => Some(OrderAction::StartPreparing),
            OrderStatus::Ready => Some(OrderAction::MarkReady),
            OrderStatus::Assigned => Some(OrderAction::AssignDelivery),
            OrderStatus::OutForDelivery => Some(OrderAction::StartDelivery),
            OrderStatus::Delivered => Some(OrderAction::MarkDelivered),
            OrderStatus::Cancelled => Some(OrderAction::Cancel),
        }
    }

    /// Display label for action buttons
    pub fn label(self) -> &'static str {
        match self {
            OrderAction::Accept => "Accept",
            OrderAction::Decline => "Decline",
            OrderAction::StartPreparing => "Start preparing",
            OrderAction::MarkReady => "Mark ready",
            OrderAction::AssignDelivery => "Assign delivery",
            OrderAction::StartDelivery => "Start delivery",
            OrderAction::MarkDelivered => "Mark delivered",
            OrderAction::Cancel => "Cancel",
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Commands the dashboard may offer for an order in `status`.
///
/// Derived from the transition table, so the buttons offered and the
/// transitions enforced can never drift apart.
pub fn available_actions(status: OrderStatus) -> Vec<OrderAction> {
    status
        .valid_transitions()
        .iter()
        .filter_map(|&to| OrderAction::for_target(to))
        .collect()
}

//! Shared types for the order lifecycle model

use serde::{Deserialize, Serialize};

// ============================================================================
// Payment
// ============================================================================

/// Payment status - evolves independently of the fulfillment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Received,
    Failed,
    Refunded,
    PartiallyRefunded,
}

// ============================================================================
// Items
// ============================================================================

/// Line item on an order
///
/// `total_price` is always recomputed from `quantity * price`; it is never
/// set independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Product ID
    pub product_id: String,
    /// Product name snapshot
    pub name: String,
    /// Quantity
    pub quantity: i32,
    /// Sale unit (kg, piece, litre, ...)
    pub unit: String,
    /// Unit price
    pub price: f64,
    /// Line total, computed as quantity * price
    pub total_price: f64,
    /// Packed by the seller
    #[serde(default)]
    pub packed: bool,
    /// In stock / substitutable
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// Item input for order intake - line total is computed by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit: String,
    pub price: f64,
}

// ============================================================================
// Customer
// ============================================================================

/// Customer reference data, copied onto the order at creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
}

// ============================================================================
// Delivery Assignment
// ============================================================================

/// Delivery assignment recorded when an order reaches `Assigned`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeliveryAssignment {
    /// Delivery person ID
    pub delivery_boy_id: String,
    /// Delivery person name snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_boy_name: Option<String>,
    /// Delivery person phone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Assignment timestamp (Unix milliseconds)
    pub assigned_at: i64,
    /// Estimated delivery time (Unix milliseconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_at: Option<i64>,
}

/// Assignment payload required by the `Assigned` transition
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssignmentInput {
    pub delivery_boy_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_boy_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_at: Option<i64>,
}

impl AssignmentInput {
    pub fn new(delivery_boy_id: impl Into<String>) -> Self {
        Self {
            delivery_boy_id: delivery_boy_id.into(),
            ..Self::default()
        }
    }

    /// Materialize the assignment, stamping the assignment time.
    pub fn into_assignment(self, assigned_at: i64) -> DeliveryAssignment {
        DeliveryAssignment {
            delivery_boy_id: self.delivery_boy_id,
            delivery_boy_name: self.delivery_boy_name,
            phone: self.phone,
            assigned_at,
            estimated_delivery_at: self.estimated_delivery_at,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Side payload for a transition request
///
/// `assignment` is required when targeting `Assigned`; `reason` is recorded
/// when targeting `Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct TransitionContext {
    pub assignment: Option<AssignmentInput>,
    pub reason: Option<String>,
}

impl TransitionContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_assignment(assignment: AssignmentInput) -> Self {
        Self {
            assignment: Some(assignment),
            reason: None,
        }
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            assignment: None,
            reason: Some(reason.into()),
        }
    }
}

/// Intake payload for a newly placed order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer: CustomerInfo,
    pub items: Vec<OrderItemDraft>,
    /// Initial payment status (defaults to Pending)
    #[serde(default)]
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_input_materializes_with_timestamp() {
        let input = AssignmentInput {
            delivery_boy_id: "db1".to_string(),
            delivery_boy_name: Some("Ravi Kumar".to_string()),
            phone: None,
            estimated_delivery_at: Some(1_700_000_000_000),
        };
        let assignment = input.into_assignment(1_699_999_000_000);
        assert_eq!(assignment.delivery_boy_id, "db1");
        assert_eq!(assignment.assigned_at, 1_699_999_000_000);
        assert_eq!(assignment.estimated_delivery_at, Some(1_700_000_000_000));
    }

    #[test]
    fn test_order_item_available_defaults_true() {
        let json = r#"{
            "product_id": "p1",
            "name": "Tomatoes",
            "quantity": 2,
            "unit": "kg",
            "price": 40.0,
            "total_price": 80.0
        }"#;
        let item: OrderItem = serde_json::from_str(json).unwrap();
        assert!(item.available);
        assert!(!item.packed);
    }

    #[test]
    fn test_payment_status_serde_rename() {
        let json = serde_json::to_string(&PaymentStatus::PartiallyRefunded).unwrap();
        assert_eq!(json, "\"PARTIALLY_REFUNDED\"");
    }
}

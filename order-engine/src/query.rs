//! Read-only projections over the order store
//!
//! Every query takes the read lock once and observes a consistent snapshot;
//! none of them mutate. Iteration order is always store insertion order.

use crate::error::StoreResult;
use crate::money;
use crate::store::OrderStore;
use chrono::{NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::order::{Order, OrderStatus, OrderTimelineEvent, PaymentStatus};

/// Dashboard aggregate counters
///
/// Every order falls into exactly one bucket, so the buckets always sum to
/// `total`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderStats {
    pub total: usize,
    /// Status New
    pub new: usize,
    /// Statuses Accepted, Preparing, Ready
    pub preparing: usize,
    /// Statuses Assigned, OutForDelivery
    pub out_for_delivery: usize,
    /// Status Delivered
    pub delivered: usize,
    /// Statuses Cancelled, Declined
    pub cancelled: usize,
    /// round(delivered / total * 100); 0 when the store is empty
    pub completion_rate: u32,
}

impl OrderStore {
    /// Look up one order by internal id.
    pub fn get(&self, order_id: &str) -> StoreResult<Order> {
        self.read_inner().get(order_id).cloned()
    }

    /// All orders, in insertion order.
    pub fn all_orders(&self) -> Vec<Order> {
        self.read_inner().ordered().cloned().collect()
    }

    /// The audit timeline of one order.
    pub fn timeline(&self, order_id: &str) -> StoreResult<Vec<OrderTimelineEvent>> {
        Ok(self.read_inner().get(order_id)?.timeline.clone())
    }

    /// Orders whose status is any of `statuses`, in insertion order.
    pub fn by_status(&self, statuses: &[OrderStatus]) -> Vec<Order> {
        self.read_inner()
            .ordered()
            .filter(|order| statuses.contains(&order.status))
            .cloned()
            .collect()
    }

    /// Orders not yet handed to delivery and not terminal.
    pub fn pending_orders(&self) -> Vec<Order> {
        self.read_inner()
            .ordered()
            .filter(|order| order.is_pending())
            .cloned()
            .collect()
    }

    /// Orders currently with a delivery person.
    pub fn active_deliveries(&self) -> Vec<Order> {
        self.read_inner()
            .ordered()
            .filter(|order| order.is_active_delivery())
            .cloned()
            .collect()
    }

    /// Orders created on the same calendar day as `reference_millis`,
    /// midnight to midnight in the store's configured offset.
    pub fn today_orders(&self, reference_millis: i64) -> Vec<Order> {
        let Some(reference_date) = self.local_date(reference_millis) else {
            return Vec::new();
        };
        self.read_inner()
            .ordered()
            .filter(|order| self.local_date(order.created_at) == Some(reference_date))
            .cloned()
            .collect()
    }

    /// Realized revenue: delivered orders whose payment was received.
    ///
    /// Orders failing either condition contribute zero; unpaid or
    /// undelivered orders are not realized revenue.
    pub fn total_revenue(&self) -> f64 {
        let total: Decimal = self
            .read_inner()
            .ordered()
            .filter(|order| {
                order.status == OrderStatus::Delivered
                    && order.payment_status == PaymentStatus::Received
            })
            .map(|order| money::to_decimal(order.payment_amount))
            .sum();
        money::to_f64(total)
    }

    /// Aggregate counters for the dashboard home screen.
    pub fn stats(&self) -> OrderStats {
        let mut stats = OrderStats::default();
        for order in self.read_inner().ordered() {
            stats.total += 1;
            match order.status {
                OrderStatus::New => stats.new += 1,
                OrderStatus::Accepted | OrderStatus::Preparing | OrderStatus::Ready => {
                    stats.preparing += 1
                }
                OrderStatus::Assigned | OrderStatus::OutForDelivery => {
                    stats.out_for_delivery += 1
                }
                OrderStatus::Delivered => stats.delivered += 1,
                OrderStatus::Cancelled | OrderStatus::Declined => stats.cancelled += 1,
            }
        }
        if stats.total > 0 {
            stats.completion_rate =
                ((stats.delivered as f64 / stats.total as f64) * 100.0).round() as u32;
        }
        stats
    }

    /// Number of orders in the store.
    pub fn order_count(&self) -> usize {
        self.read_inner().len()
    }

    fn local_date(&self, millis: i64) -> Option<NaiveDate> {
        self.offset()
            .timestamp_millis_opt(millis)
            .single()
            .map(|dt| dt.date_naive())
    }
}

//! OrderStore - authoritative order collection and command processing
//!
//! # Command Flow
//!
//! ```text
//! transition(order_id, to, ctx)
//!     ├─ 1. Claim the order id (at most one in-flight mutation per order)
//!     ├─ 2. Take the write lock
//!     ├─ 3. Validate against the transition table (mutate nothing on rejection)
//!     ├─ 4. Apply status + timeline + dependent fields together
//!     ├─ 5. Release the write lock
//!     ├─ 6. Broadcast the update
//!     └─ 7. Release the claim
//! ```
//!
//! Readers take the read lock and observe either pre- or post-state of a
//! mutation, never a partial one.

use crate::error::{StoreError, StoreResult};
use crate::money;
use chrono::{DateTime, FixedOffset, Local, Offset, Utc};
use parking_lot::{Mutex, RwLock};
use shared::order::{
    Order, OrderDraft, OrderStatus, OrderTimelineEvent, OrderUpdate, PaymentStatus,
    TransitionContext,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

/// Update broadcast channel capacity
const UPDATE_CHANNEL_CAPACITY: usize = 1024;

/// Store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Prefix for generated order codes
    pub code_prefix: String,
    /// UTC offset for calendar-day boundaries (today's orders, code dates)
    pub utc_offset_minutes: i32,
    /// Capacity of the update broadcast channel
    pub channel_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            code_prefix: "ORD".to_string(),
            utc_offset_minutes: Local::now().offset().local_minus_utc() / 60,
            channel_capacity: UPDATE_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StoreInner {
    orders: HashMap<String, Order>,
    /// Insertion order, preserved by every query
    insertion: Vec<String>,
}

impl StoreInner {
    pub(crate) fn get(&self, order_id: &str) -> StoreResult<&Order> {
        self.orders
            .get(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))
    }

    /// Orders in insertion order.
    pub(crate) fn ordered(&self) -> impl Iterator<Item = &Order> {
        self.insertion.iter().filter_map(|id| self.orders.get(id))
    }

    pub(crate) fn len(&self) -> usize {
        self.insertion.len()
    }

    fn get_mut(&mut self, order_id: &str) -> StoreResult<&mut Order> {
        self.orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::OrderNotFound(order_id.to_string()))
    }

    fn insert(&mut self, order: Order) {
        self.insertion.push(order.id.clone());
        self.orders.insert(order.id.clone(), order);
    }
}

/// OrderStore for command processing and queries
///
/// The store is the only component permitted to mutate an [`Order`]; the
/// state machine and the query layer only read.
pub struct OrderStore {
    inner: RwLock<StoreInner>,
    /// Order ids with a mutation currently in flight
    in_flight: Mutex<HashSet<String>>,
    update_tx: broadcast::Sender<OrderUpdate>,
    code_counter: AtomicU64,
    config: StoreConfig,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore")
            .field("orders", &self.inner.read().insertion.len())
            .field("config", &self.config)
            .finish()
    }
}

/// RAII claim on an order id; released on drop
struct MutationClaim<'a> {
    store: &'a OrderStore,
    order_id: String,
}

impl Drop for MutationClaim<'_> {
    fn drop(&mut self) {
        self.store.in_flight.lock().remove(&self.order_id);
    }
}

impl OrderStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        let (update_tx, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            inner: RwLock::new(StoreInner::default()),
            in_flight: Mutex::new(HashSet::new()),
            update_tx,
            code_counter: AtomicU64::new(0),
            config,
        }
    }

    /// Create a store pre-populated with seed orders.
    ///
    /// Every seed record is validated against the model invariants; line
    /// totals are recomputed rather than trusted.
    pub fn with_orders(config: StoreConfig, seed: Vec<Order>) -> StoreResult<Self> {
        let store = Self::new(config);
        {
            let mut inner = store.inner.write();
            for mut order in seed {
                validate_seed_order(&order)?;
                if inner.orders.contains_key(&order.id) {
                    return Err(StoreError::Validation(format!(
                        "duplicate order id in seed: {}",
                        order.id
                    )));
                }
                money::recompute_line_totals(&mut order.items);
                inner.insert(order);
            }
            store
                .code_counter
                .store(inner.insertion.len() as u64, Ordering::Relaxed);
        }
        tracing::info!(count = store.inner.read().insertion.len(), "Order store seeded");
        Ok(store)
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Subscribe to update broadcasts.
    ///
    /// Updates are sent after a mutation and its timeline append are both
    /// committed. The UI owns the receiver and drops it on unmount.
    pub fn subscribe(&self) -> broadcast::Receiver<OrderUpdate> {
        self.update_tx.subscribe()
    }

    /// The store's calendar offset for day boundaries.
    pub(crate) fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.config.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }

    pub(crate) fn read_inner(&self) -> parking_lot::RwLockReadGuard<'_, StoreInner> {
        self.inner.read()
    }

    /// Generate the next human-facing order code.
    fn next_order_code(&self) -> String {
        let count = self.code_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let local: DateTime<FixedOffset> = Utc::now().with_timezone(&self.offset());
        format!(
            "{}-{}-{:04}",
            self.config.code_prefix,
            local.format("%Y%m%d"),
            count
        )
    }

    /// Claim exclusive mutation rights on an order id.
    fn claim(&self, order_id: &str) -> StoreResult<MutationClaim<'_>> {
        let mut in_flight = self.in_flight.lock();
        if !in_flight.insert(order_id.to_string()) {
            tracing::warn!(order_id = %order_id, "Rejected concurrent mutation");
            return Err(StoreError::ConcurrentModification(order_id.to_string()));
        }
        Ok(MutationClaim {
            store: self,
            order_id: order_id.to_string(),
        })
    }

    fn notify(&self, order: &Order, event: Option<OrderTimelineEvent>) {
        // Send errors only mean there are no subscribers
        let _ = self.update_tx.send(OrderUpdate {
            order_id: order.id.clone(),
            code: order.code.clone(),
            status: order.status,
            event,
        });
    }

    // ========== Commands ==========

    /// Intake a newly placed order.
    ///
    /// Validates the draft, computes line totals and the payment amount,
    /// generates the internal id and order code, and records the synthetic
    /// creation event.
    pub fn create_order(&self, draft: OrderDraft) -> StoreResult<Order> {
        validate_customer(&draft.customer)?;
        for item in &draft.items {
            money::validate_item_draft(item)?;
        }

        let items: Vec<_> = draft.items.into_iter().map(money::item_from_draft).collect();
        let payment_amount = money::order_total(&items);
        let order = Order::new(
            uuid::Uuid::new_v4().to_string(),
            self.next_order_code(),
            draft.customer,
            items,
            payment_amount,
            draft.payment_status,
        );

        let _claim = self.claim(&order.id)?;
        {
            let mut inner = self.inner.write();
            inner.insert(order.clone());
        }
        tracing::info!(order_id = %order.id, code = %order.code, "Order created");
        let creation = order.timeline.first().cloned();
        self.notify(&order, creation);
        Ok(order)
    }

    /// Request a status transition for one order.
    ///
    /// Validates via the state machine before touching the order; a
    /// rejected request leaves status, timeline, and dependent fields
    /// untouched. Transitions to `Assigned` require an assignment payload
    /// in `ctx`.
    pub fn transition(
        &self,
        order_id: &str,
        to: OrderStatus,
        ctx: TransitionContext,
    ) -> StoreResult<Order> {
        let _claim = self.claim(order_id)?;

        let (updated, event) = {
            let mut inner = self.inner.write();
            let order = inner.get_mut(order_id)?;
            let from = order.status;

            if !from.can_transition_to(to) {
                tracing::warn!(order_id = %order_id, from = %from, to = %to, "Invalid transition");
                return Err(StoreError::InvalidTransition { from, to });
            }
            if to == OrderStatus::Accepted && order.items.is_empty() {
                return Err(StoreError::EmptyOrder(order_id.to_string()));
            }
            let assignment = if to == OrderStatus::Assigned {
                match ctx.assignment {
                    Some(input) => Some(input),
                    None => return Err(StoreError::MissingAssignment(order_id.to_string())),
                }
            } else {
                None
            };

            // All validation passed; from here the mutation applies as a whole.
            let detail = match to {
                OrderStatus::Assigned => assignment
                    .as_ref()
                    .map(|a| a.delivery_boy_name.clone().unwrap_or_else(|| a.delivery_boy_id.clone())),
                OrderStatus::Cancelled => ctx.reason.clone(),
                _ => None,
            };
            let event = OrderTimelineEvent::for_transition(from, to, detail.as_deref())
                .ok_or(StoreError::InvalidTransition { from, to })?;

            order.status = to;
            order.updated_at = event.timestamp;
            if let Some(input) = assignment {
                order.delivery_assignment = Some(input.into_assignment(event.timestamp));
            }
            if to == OrderStatus::Cancelled {
                order.cancellation_reason = ctx.reason;
            }
            order.timeline.push(event.clone());

            tracing::info!(order_id = %order_id, from = %from, to = %to, "Order transitioned");
            (order.clone(), event)
        };

        self.notify(&updated, Some(event));
        Ok(updated)
    }

    /// Cancel an order, recording the reason.
    ///
    /// Sugar over `transition(.., Cancelled, ..)`; legal from any
    /// non-terminal status the table allows.
    pub fn cancel(&self, order_id: &str, reason: impl Into<String>) -> StoreResult<Order> {
        self.transition(
            order_id,
            OrderStatus::Cancelled,
            TransitionContext::with_reason(reason),
        )
    }

    /// Update the payment status of an order.
    ///
    /// The payment lifecycle is orthogonal to fulfillment; this is not
    /// gated by the transition table and appends no timeline event.
    pub fn record_payment_status(
        &self,
        order_id: &str,
        status: PaymentStatus,
    ) -> StoreResult<Order> {
        let _claim = self.claim(order_id)?;
        let updated = {
            let mut inner = self.inner.write();
            let order = inner.get_mut(order_id)?;
            order.payment_status = status;
            order.updated_at = Utc::now().timestamp_millis();
            tracing::info!(order_id = %order_id, payment_status = ?status, "Payment status recorded");
            order.clone()
        };
        self.notify(&updated, None);
        Ok(updated)
    }

    /// Mark an item packed/unpacked on the packing screen.
    pub fn set_item_packed(
        &self,
        order_id: &str,
        product_id: &str,
        packed: bool,
    ) -> StoreResult<Order> {
        self.update_item(order_id, product_id, |item| item.packed = packed)
    }

    /// Flag an item as available/out of stock.
    pub fn set_item_available(
        &self,
        order_id: &str,
        product_id: &str,
        available: bool,
    ) -> StoreResult<Order> {
        self.update_item(order_id, product_id, |item| item.available = available)
    }

    fn update_item(
        &self,
        order_id: &str,
        product_id: &str,
        apply: impl FnOnce(&mut shared::order::OrderItem),
    ) -> StoreResult<Order> {
        let _claim = self.claim(order_id)?;
        let updated = {
            let mut inner = self.inner.write();
            let order = inner.get_mut(order_id)?;
            let item = order
                .items
                .iter_mut()
                .find(|item| item.product_id == product_id)
                .ok_or_else(|| StoreError::ItemNotFound {
                    order_id: order_id.to_string(),
                    product_id: product_id.to_string(),
                })?;
            apply(item);
            order.updated_at = Utc::now().timestamp_millis();
            order.clone()
        };
        self.notify(&updated, None);
        Ok(updated)
    }
}

fn validate_customer(customer: &shared::order::CustomerInfo) -> StoreResult<()> {
    if customer.name.is_empty() {
        return Err(StoreError::Validation("customer name must not be empty".to_string()));
    }
    if customer.phone.is_empty() {
        return Err(StoreError::Validation("customer phone must not be empty".to_string()));
    }
    if customer.address.is_empty() {
        return Err(StoreError::Validation("customer address must not be empty".to_string()));
    }
    Ok(())
}

fn validate_seed_order(order: &Order) -> StoreResult<()> {
    if order.timeline.is_empty() {
        return Err(StoreError::Validation(format!(
            "seed order {} has an empty timeline",
            order.id
        )));
    }
    if !order.timeline_consistent() {
        return Err(StoreError::Validation(format!(
            "seed order {} timeline tail does not match its status",
            order.id
        )));
    }
    if !order.payment_amount.is_finite() || order.payment_amount < 0.0 {
        return Err(StoreError::Validation(format!(
            "seed order {} has an invalid payment amount",
            order.id
        )));
    }
    if order.is_pending() && order.delivery_assignment.is_some() {
        return Err(StoreError::Validation(format!(
            "seed order {} carries a delivery assignment before Assigned",
            order.id
        )));
    }
    if order.cancellation_reason.is_some() && order.status != OrderStatus::Cancelled {
        return Err(StoreError::Validation(format!(
            "seed order {} carries a cancellation reason without being cancelled",
            order.id
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{AssignmentInput, CustomerInfo, OrderItemDraft, TimelineActor};

    fn test_customer() -> CustomerInfo {
        CustomerInfo {
            name: "Asha Verma".to_string(),
            phone: "+91-90000-11111".to_string(),
            email: Some("asha@example.com".to_string()),
            address: "12 Market Road".to_string(),
            landmark: None,
        }
    }

    fn test_draft(items: Vec<OrderItemDraft>) -> OrderDraft {
        OrderDraft {
            customer: test_customer(),
            items,
            payment_status: PaymentStatus::Pending,
        }
    }

    fn simple_item(product_id: &str, name: &str, price: f64, quantity: i32) -> OrderItemDraft {
        OrderItemDraft {
            product_id: product_id.to_string(),
            name: name.to_string(),
            quantity,
            unit: "kg".to_string(),
            price,
        }
    }

    fn create_test_store() -> OrderStore {
        OrderStore::new(StoreConfig {
            code_prefix: "ORD".to_string(),
            utc_offset_minutes: 0,
            channel_capacity: 64,
        })
    }

    fn place_order(store: &OrderStore) -> Order {
        store
            .create_order(test_draft(vec![
                simple_item("p1", "Tomatoes", 40.0, 2),
                simple_item("p2", "Milk", 30.0, 1),
            ]))
            .unwrap()
    }

    #[test]
    fn test_create_order_computes_amount_and_code() {
        let store = create_test_store();
        let order = place_order(&store);

        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.payment_amount, 110.0);
        assert_eq!(order.items[0].total_price, 80.0);
        assert!(order.code.starts_with("ORD-"));
        assert!(order.code.ends_with("-0001"));
        assert_eq!(order.timeline.len(), 1);
        assert_eq!(order.timeline[0].actor, TimelineActor::System);
    }

    #[test]
    fn test_order_codes_are_unique_and_sequential() {
        let store = create_test_store();
        let first = place_order(&store);
        let second = place_order(&store);
        assert_ne!(first.id, second.id);
        assert_ne!(first.code, second.code);
        assert!(second.code.ends_with("-0002"));
    }

    #[test]
    fn test_create_order_rejects_bad_draft() {
        let store = create_test_store();
        let mut draft = test_draft(vec![simple_item("p1", "Tomatoes", -1.0, 2)]);
        assert!(matches!(
            store.create_order(draft.clone()),
            Err(StoreError::Validation(_))
        ));
        draft.items = vec![simple_item("p1", "Tomatoes", 40.0, 2)];
        draft.customer.phone = String::new();
        assert!(matches!(
            store.create_order(draft),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_transition_happy_path_appends_timeline() {
        let store = create_test_store();
        let order = place_order(&store);

        let order = store
            .transition(&order.id, OrderStatus::Accepted, TransitionContext::none())
            .unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);
        assert_eq!(order.timeline.len(), 2);
        assert_eq!(order.timeline.last().unwrap().status, OrderStatus::Accepted);
        assert!(order.updated_at >= order.created_at);
    }

    #[test]
    fn test_invalid_transition_rejected_and_order_untouched() {
        let store = create_test_store();
        let order = place_order(&store);

        let result = store.transition(&order.id, OrderStatus::Ready, TransitionContext::none());
        assert_eq!(
            result,
            Err(StoreError::InvalidTransition {
                from: OrderStatus::New,
                to: OrderStatus::Ready,
            })
        );

        let inner = store.read_inner();
        let stored = inner.get(&order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::New);
        assert_eq!(stored.timeline.len(), 1);
        assert_eq!(stored.updated_at, order.updated_at);
    }

    #[test]
    fn test_transition_unknown_order() {
        let store = create_test_store();
        let result = store.transition("missing", OrderStatus::Accepted, TransitionContext::none());
        assert_eq!(result, Err(StoreError::OrderNotFound("missing".to_string())));
    }

    #[test]
    fn test_accept_empty_order_rejected() {
        let store = create_test_store();
        let order = store.create_order(test_draft(vec![])).unwrap();
        let result = store.transition(&order.id, OrderStatus::Accepted, TransitionContext::none());
        assert_eq!(result, Err(StoreError::EmptyOrder(order.id.clone())));
        // Declining the empty order is still legal
        store
            .transition(&order.id, OrderStatus::Declined, TransitionContext::none())
            .unwrap();
    }

    #[test]
    fn test_assignment_gating() {
        let store = create_test_store();
        let order = place_order(&store);
        for to in [
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            store.transition(&order.id, to, TransitionContext::none()).unwrap();
        }

        let result = store.transition(&order.id, OrderStatus::Assigned, TransitionContext::none());
        assert_eq!(result, Err(StoreError::MissingAssignment(order.id.clone())));

        let order = store
            .transition(
                &order.id,
                OrderStatus::Assigned,
                TransitionContext::with_assignment(AssignmentInput::new("db1")),
            )
            .unwrap();
        let assignment = order.delivery_assignment.as_ref().unwrap();
        assert_eq!(assignment.delivery_boy_id, "db1");
        assert!(assignment.assigned_at > 0);
        assert_eq!(
            order.timeline.last().unwrap().description,
            "Delivery assigned: db1"
        );
    }

    #[test]
    fn test_assignment_survives_forward_transitions() {
        let store = create_test_store();
        let order = place_order(&store);
        for to in [
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ] {
            store.transition(&order.id, to, TransitionContext::none()).unwrap();
        }
        store
            .transition(
                &order.id,
                OrderStatus::Assigned,
                TransitionContext::with_assignment(AssignmentInput::new("db1")),
            )
            .unwrap();
        let order = store
            .transition(&order.id, OrderStatus::OutForDelivery, TransitionContext::none())
            .unwrap();
        assert!(order.delivery_assignment.is_some());
        let order = store
            .transition(&order.id, OrderStatus::Delivered, TransitionContext::none())
            .unwrap();
        assert!(order.delivery_assignment.is_some());
    }

    #[test]
    fn test_cancel_records_reason() {
        let store = create_test_store();
        let order = place_order(&store);
        store
            .transition(&order.id, OrderStatus::Accepted, TransitionContext::none())
            .unwrap();
        store
            .transition(&order.id, OrderStatus::Preparing, TransitionContext::none())
            .unwrap();

        let order = store.cancel(&order.id, "customer request").unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.cancellation_reason.as_deref(), Some("customer request"));
        assert_eq!(
            order.timeline.last().unwrap().description,
            "Order cancelled: customer request"
        );

        let result = store.transition(&order.id, OrderStatus::Ready, TransitionContext::none());
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
    }

    #[test]
    fn test_terminal_orders_reject_every_target() {
        let store = create_test_store();
        let order = place_order(&store);
        store
            .transition(&order.id, OrderStatus::Declined, TransitionContext::none())
            .unwrap();

        for to in OrderStatus::ALL {
            let result = store.transition(&order.id, to, TransitionContext::none());
            assert!(
                matches!(result, Err(StoreError::InvalidTransition { .. })),
                "Declined order accepted transition to {:?}",
                to
            );
        }
    }

    #[test]
    fn test_record_payment_status_is_not_table_gated() {
        let store = create_test_store();
        let order = place_order(&store);
        store
            .transition(&order.id, OrderStatus::Declined, TransitionContext::none())
            .unwrap();

        // Terminal for fulfillment, but the payment lifecycle still moves
        let order = store
            .record_payment_status(&order.id, PaymentStatus::Refunded)
            .unwrap();
        assert_eq!(order.payment_status, PaymentStatus::Refunded);
        assert_eq!(order.status, OrderStatus::Declined);
        // No timeline event for payment changes
        assert_eq!(order.timeline.len(), 2);
    }

    #[test]
    fn test_item_flags_bump_updated_at_without_timeline() {
        let store = create_test_store();
        let order = place_order(&store);

        let updated = store.set_item_packed(&order.id, "p1", true).unwrap();
        assert!(updated.item("p1").unwrap().packed);
        assert_eq!(updated.timeline.len(), 1);
        assert!(updated.updated_at >= order.updated_at);

        let updated = store.set_item_available(&order.id, "p2", false).unwrap();
        assert!(!updated.item("p2").unwrap().available);

        let result = store.set_item_packed(&order.id, "p9", true);
        assert!(matches!(result, Err(StoreError::ItemNotFound { .. })));
    }

    #[test]
    fn test_in_flight_claim_rejects_second_mutation() {
        let store = create_test_store();
        let order = place_order(&store);

        let _claim = store.claim(&order.id).unwrap();
        let result = store.transition(&order.id, OrderStatus::Accepted, TransitionContext::none());
        assert_eq!(
            result,
            Err(StoreError::ConcurrentModification(order.id.clone()))
        );
        drop(_claim);

        // Claim released; the same mutation now succeeds
        store
            .transition(&order.id, OrderStatus::Accepted, TransitionContext::none())
            .unwrap();
    }

    #[test]
    fn test_claim_released_after_rejected_mutation() {
        let store = create_test_store();
        let order = place_order(&store);

        let result = store.transition(&order.id, OrderStatus::Delivered, TransitionContext::none());
        assert!(matches!(result, Err(StoreError::InvalidTransition { .. })));
        // The failed attempt must not leave the id claimed
        store
            .transition(&order.id, OrderStatus::Accepted, TransitionContext::none())
            .unwrap();
    }

    #[test]
    fn test_updates_broadcast_after_commit() {
        let store = create_test_store();
        let mut rx = store.subscribe();

        let order = place_order(&store);
        let update = rx.try_recv().unwrap();
        assert_eq!(update.order_id, order.id);
        assert_eq!(update.status, OrderStatus::New);
        assert!(update.event.is_some());

        store
            .transition(&order.id, OrderStatus::Accepted, TransitionContext::none())
            .unwrap();
        let update = rx.try_recv().unwrap();
        assert_eq!(update.status, OrderStatus::Accepted);
        assert_eq!(
            update.event.as_ref().unwrap().status,
            OrderStatus::Accepted
        );

        store
            .record_payment_status(&order.id, PaymentStatus::Received)
            .unwrap();
        let update = rx.try_recv().unwrap();
        assert!(update.event.is_none());
    }

    #[test]
    fn test_rejected_mutation_broadcasts_nothing() {
        let store = create_test_store();
        let order = place_order(&store);
        let mut rx = store.subscribe();

        let _ = store.transition(&order.id, OrderStatus::Delivered, TransitionContext::none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_seed_validation() {
        let order = Order::new(
            "id-1".to_string(),
            "ORD-20260806-0001".to_string(),
            test_customer(),
            vec![],
            0.0,
            PaymentStatus::Pending,
        );

        let mut drifted = order.clone();
        drifted.status = OrderStatus::Accepted; // timeline tail still New
        let result = OrderStore::with_orders(StoreConfig::default(), vec![drifted]);
        assert!(matches!(result, Err(StoreError::Validation(_))));

        let result =
            OrderStore::with_orders(StoreConfig::default(), vec![order.clone(), order.clone()]);
        assert!(matches!(result, Err(StoreError::Validation(_))));

        let store = OrderStore::with_orders(StoreConfig::default(), vec![order]).unwrap();
        assert_eq!(store.read_inner().insertion.len(), 1);
    }

    #[test]
    fn test_seed_recomputes_line_totals() {
        let mut order = Order::new(
            "id-1".to_string(),
            "ORD-20260806-0001".to_string(),
            test_customer(),
            vec![money::item_from_draft(simple_item("p1", "Tomatoes", 40.0, 2))],
            80.0,
            PaymentStatus::Pending,
        );
        order.items[0].total_price = 1.0; // stale value in seed data

        let store = OrderStore::with_orders(StoreConfig::default(), vec![order]).unwrap();
        let inner = store.read_inner();
        assert_eq!(inner.get("id-1").unwrap().items[0].total_price, 80.0);
    }

    #[test]
    fn test_concurrent_transitions_from_threads() {
        use std::sync::Arc;

        let store = Arc::new(create_test_store());
        let order = place_order(&store);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let order_id = order.id.clone();
            handles.push(std::thread::spawn(move || {
                store.transition(&order_id, OrderStatus::Accepted, TransitionContext::none())
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one Accept wins; the rest see a consistent post-state
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        for result in results.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                result,
                Err(StoreError::InvalidTransition { from: OrderStatus::Accepted, .. })
                    | Err(StoreError::ConcurrentModification(_))
            ));
        }

        let inner = store.read_inner();
        let stored = inner.get(&order.id).unwrap();
        assert_eq!(stored.status, OrderStatus::Accepted);
        assert_eq!(stored.timeline.len(), 2);
    }
}

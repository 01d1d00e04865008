//! Walk one order through the full lifecycle and print the dashboard views.
//!
//! Run with: cargo run -p order-engine --example seller_flow

use order_engine::{
    AssignmentInput, CustomerInfo, OrderDraft, OrderItemDraft, OrderStatus, OrderStore,
    PaymentStatus, StoreConfig, TransitionContext, available_actions,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let store = OrderStore::new(StoreConfig::default());
    let mut updates = store.subscribe();

    let order = store
        .create_order(OrderDraft {
            customer: CustomerInfo {
                name: "Asha Verma".to_string(),
                phone: "+91-90000-11111".to_string(),
                email: None,
                address: "12 Market Road".to_string(),
                landmark: Some("opposite the post office".to_string()),
            },
            items: vec![
                OrderItemDraft {
                    product_id: "p1".to_string(),
                    name: "Tomatoes".to_string(),
                    quantity: 2,
                    unit: "kg".to_string(),
                    price: 40.0,
                },
                OrderItemDraft {
                    product_id: "p2".to_string(),
                    name: "Milk".to_string(),
                    quantity: 1,
                    unit: "litre".to_string(),
                    price: 30.0,
                },
            ],
            payment_status: PaymentStatus::Pending,
        })
        .expect("valid draft");

    println!("placed {} ({:.2})", order.code, order.payment_amount);
    println!("actions: {:?}", available_actions(order.status));

    let path = [
        OrderStatus::Accepted,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Assigned,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];
    for to in path {
        let ctx = if to == OrderStatus::Assigned {
            TransitionContext::with_assignment(AssignmentInput {
                delivery_boy_id: "db1".to_string(),
                delivery_boy_name: Some("Ravi Kumar".to_string()),
                phone: None,
                estimated_delivery_at: None,
            })
        } else {
            TransitionContext::none()
        };
        store.transition(&order.id, to, ctx).expect("legal transition");
    }
    store
        .record_payment_status(&order.id, PaymentStatus::Received)
        .expect("order exists");

    while let Ok(update) = updates.try_recv() {
        let what = update
            .event
            .map(|e| e.description)
            .unwrap_or_else(|| "payment updated".to_string());
        println!("[{}] {}", update.code, what);
    }

    let stats = store.stats();
    println!(
        "orders: {} | delivered: {} | completion: {}%",
        stats.total, stats.delivered, stats.completion_rate
    );
    println!("revenue: {:.2}", store.total_revenue());
}

//! Money calculation utilities using rust_decimal for precision
//!
//! All arithmetic on amounts is done with `Decimal` internally, then
//! converted to `f64` for storage/serialization.

use crate::error::{StoreError, StoreResult};
use rust_decimal::prelude::*;
use shared::order::{OrderItem, OrderItemDraft};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> StoreResult<()> {
    if !value.is_finite() {
        return Err(StoreError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate an OrderItemDraft before intake
pub fn validate_item_draft(item: &OrderItemDraft) -> StoreResult<()> {
    if item.product_id.is_empty() {
        return Err(StoreError::Validation("product_id must not be empty".to_string()));
    }
    if item.name.is_empty() {
        return Err(StoreError::Validation("item name must not be empty".to_string()));
    }

    require_finite(item.price, "price")?;
    if item.price < 0.0 {
        return Err(StoreError::Validation(format!(
            "price must be non-negative, got {}",
            item.price
        )));
    }
    if item.price > MAX_PRICE {
        return Err(StoreError::Validation(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, item.price
        )));
    }

    if item.quantity <= 0 {
        return Err(StoreError::Validation(format!(
            "quantity must be positive, got {}",
            item.quantity
        )));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(StoreError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, item.quantity
        )));
    }

    Ok(())
}

/// Line total for a quantity at a unit price, 2-dp rounded
pub fn line_total(quantity: i32, price: f64) -> f64 {
    to_f64(Decimal::from(quantity) * to_decimal(price))
}

/// Materialize a draft into an item with its computed line total
pub fn item_from_draft(draft: OrderItemDraft) -> OrderItem {
    let total_price = line_total(draft.quantity, draft.price);
    OrderItem {
        product_id: draft.product_id,
        name: draft.name,
        quantity: draft.quantity,
        unit: draft.unit,
        price: draft.price,
        total_price,
        packed: false,
        available: true,
    }
}

/// Order total over a set of items, accumulated in Decimal, rounded once
pub fn order_total(items: &[OrderItem]) -> f64 {
    let total: Decimal = items
        .iter()
        .map(|item| Decimal::from(item.quantity) * to_decimal(item.price))
        .sum();
    to_f64(total)
}

/// Recompute every line total in place (seed records may carry stale values)
pub fn recompute_line_totals(items: &mut [OrderItem]) {
    for item in items {
        item.total_price = line_total(item.quantity, item.price);
    }
}

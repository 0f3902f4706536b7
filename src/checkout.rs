//! Checkout

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::{self, PricingBreakdown},
};

/// Errors preventing an order from being assembled. Non-fatal; the user
/// can correct the input and retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// No delivery venue was supplied.
    #[error("delivery venue is required")]
    VenueRequired,
}

/// Immutable record of a checked-out order.
///
/// Assembled once per checkout action and handed downstream as-is. The
/// cart it came from is left untouched; clearing it remains a separate,
/// explicit action.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    order_number: String,
    placed_at: DateTime<Utc>,
    items: Vec<LineItem>,
    pricing: PricingBreakdown,
    venue: String,
    special_instructions: String,
    promo_code: Option<String>,
    estimated_delivery_minutes: u32,
}

impl OrderSnapshot {
    /// Six-digit order number. Random; uniqueness is best-effort only
    /// and downstream systems must not rely on it.
    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    /// When the order was assembled.
    pub fn placed_at(&self) -> DateTime<Utc> {
        self.placed_at
    }

    /// The line items as they were at checkout.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The final pricing breakdown.
    pub fn pricing(&self) -> &PricingBreakdown {
        &self.pricing
    }

    /// Where the order is delivered.
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Free-form instructions for the kitchen or rider.
    pub fn special_instructions(&self) -> &str {
        &self.special_instructions
    }

    /// The promotion code applied to this order, if any.
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Delivery estimate frozen at checkout.
    pub fn estimated_delivery_minutes(&self) -> u32 {
        self.estimated_delivery_minutes
    }
}

/// Freeze the cart, pricing, and delivery details into an order snapshot.
///
/// # Errors
///
/// Returns [`CheckoutError::VenueRequired`] when `venue` is empty or
/// whitespace; no snapshot is produced and the cart is untouched.
pub fn assemble(
    items: &[LineItem],
    pricing: PricingBreakdown,
    venue: &str,
    special_instructions: &str,
    promo_code: Option<&str>,
) -> Result<OrderSnapshot, CheckoutError> {
    if venue.trim().is_empty() {
        return Err(CheckoutError::VenueRequired);
    }

    Ok(OrderSnapshot {
        order_number: generate_order_number(),
        placed_at: Utc::now(),
        items: items.to_vec(),
        estimated_delivery_minutes: pricing::estimated_delivery_minutes(items),
        pricing,
        venue: venue.to_string(),
        special_instructions: special_instructions.to_string(),
        promo_code: promo_code.map(str::to_string),
    })
}

fn generate_order_number() -> String {
    let number: u32 = rand::thread_rng().gen_range(0..1_000_000);

    format!("{number:06}")
}

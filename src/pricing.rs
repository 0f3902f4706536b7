//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::items::LineItem;

/// Minutes of lead time before the first item leaves the kitchen.
pub const BASE_DELIVERY_MINUTES: u32 = 30;

/// Additional preparation minutes per unit in the cart.
pub const PER_ITEM_DELIVERY_MINUTES: u32 = 2;

/// GST rate applied to the goods subtotal.
pub fn tax_rate() -> Percentage {
    Percentage::from(0.05)
}

/// Flat fee charged for delivering a non-empty cart.
pub fn delivery_fee() -> Money<'static, Currency> {
    rupees(40)
}

/// Build an INR amount from whole rupees.
pub fn rupees(amount: i64) -> Money<'static, Currency> {
    Money::from_minor(amount * 100, iso::INR)
}

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate a percentage of an amount in minor units, rounded to the
/// nearest whole rupee and returned in minor units.
///
/// Menu prices are whole rupees and receipts print whole-rupee lines, so
/// derived amounts round at rupee granularity, midpoint away from zero,
/// once at the end of the calculation.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the calculation
/// overflows or cannot be represented.
pub fn percent_of_rupees(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    let in_rupees = minor
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(in_rupees)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::PercentConversion)?
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

/// Itemized totals for the current cart and held discount.
///
/// Derived on demand from the live line items; never cached or persisted
/// independently of the cart that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingBreakdown {
    subtotal: Money<'static, Currency>,
    tax: Money<'static, Currency>,
    delivery_fee: Money<'static, Currency>,
    discount: Money<'static, Currency>,
    total: Money<'static, Currency>,
    total_due: Money<'static, Currency>,
}

impl PricingBreakdown {
    /// Sum of unit price times quantity over all entries.
    pub fn subtotal(&self) -> Money<'static, Currency> {
        self.subtotal
    }

    /// GST on the subtotal.
    pub fn tax(&self) -> Money<'static, Currency> {
        self.tax
    }

    /// Delivery fee; zero for an empty cart.
    pub fn delivery_fee(&self) -> Money<'static, Currency> {
        self.delivery_fee
    }

    /// Discount held by the active promotion, zero without one.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }

    /// Subtotal plus tax plus delivery, before any discount.
    pub fn total(&self) -> Money<'static, Currency> {
        self.total
    }

    /// Amount payable after the discount, never below zero.
    pub fn total_due(&self) -> Money<'static, Currency> {
        self.total_due
    }
}

/// Price a cart against an already-computed promotion discount.
///
/// The subtotal accumulates exactly in minor units; GST rounds to the
/// nearest rupee once at the end. An empty cart carries no delivery fee.
///
/// # Errors
///
/// Returns a [`PricingError`] if the tax calculation cannot be
/// represented or money arithmetic fails.
pub fn quote(
    items: &[LineItem],
    discount: Money<'static, Currency>,
) -> Result<PricingBreakdown, PricingError> {
    let subtotal_minor: i64 = items
        .iter()
        .map(|item| item.line_total().to_minor_units())
        .sum();

    let subtotal = Money::from_minor(subtotal_minor, iso::INR);
    let tax = Money::from_minor(percent_of_rupees(&tax_rate(), subtotal_minor)?, iso::INR);

    let delivery = if items.is_empty() {
        rupees(0)
    } else {
        delivery_fee()
    };

    let total = subtotal.add(tax)?.add(delivery)?;

    // A held discount can outlive the cart contents it was computed
    // against; the amount due never goes negative.
    let total_due = if discount.to_minor_units() >= total.to_minor_units() {
        rupees(0)
    } else {
        total.sub(discount)?
    };

    Ok(PricingBreakdown {
        subtotal,
        tax,
        delivery_fee: delivery,
        discount,
        total,
        total_due,
    })
}

/// Deterministic delivery estimate: fixed lead time plus preparation time
/// per unit ordered. Not a live estimate.
pub fn estimated_delivery_minutes(items: &[LineItem]) -> u32 {
    let units: u32 = items.iter().map(LineItem::quantity).sum();

    BASE_DELIVERY_MINUTES + PER_ITEM_DELIVERY_MINUTES * units
}

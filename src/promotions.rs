//! Promotions

use decimal_percentage::Percentage;
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

use crate::pricing::{PricingError, percent_of_rupees, rupees};

/// A named discount rule with an eligibility floor and a payout cap.
///
/// Immutable reference data; the storefront ships its table compiled in
/// (see [`standing_offers`]), but evaluators accept any table.
#[derive(Debug, Clone)]
pub struct Promotion {
    code: String,
    percent_off: Percentage,
    max_discount: Money<'static, Currency>,
    min_order: Money<'static, Currency>,
}

impl Promotion {
    /// Create a promotion rule.
    pub fn new(
        code: impl Into<String>,
        percent_off: Percentage,
        max_discount: Money<'static, Currency>,
        min_order: Money<'static, Currency>,
    ) -> Self {
        Self {
            code: code.into(),
            percent_off,
            max_discount,
            min_order,
        }
    }

    /// The code customers submit. Matched case-insensitively.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Fraction taken off the subtotal.
    pub fn percent_off(&self) -> Percentage {
        self.percent_off
    }

    /// Cap on the discount amount.
    pub fn max_discount(&self) -> Money<'static, Currency> {
        self.max_discount
    }

    /// Subtotal floor below which the code is ineligible.
    pub fn min_order(&self) -> Money<'static, Currency> {
        self.min_order
    }
}

/// The storefront's standing offer table.
pub fn standing_offers() -> Vec<Promotion> {
    vec![
        Promotion::new("TRYNEW", Percentage::from(0.60), rupees(120), rupees(159)),
        Promotion::new("WELCOME50", Percentage::from(0.50), rupees(100), rupees(149)),
        Promotion::new("TIFFINIT", Percentage::from(0.50), rupees(100), rupees(179)),
        Promotion::new("AXIS120", Percentage::from(1.00), rupees(120), rupees(500)),
        Promotion::new("AXIS200", Percentage::from(1.00), rupees(200), rupees(1000)),
        Promotion::new("AMEXCORP", Percentage::from(0.20), rupees(150), rupees(0)),
        Promotion::new("INDUS75", Percentage::from(1.00), rupees(75), rupees(300)),
        Promotion::new("DINEOUT", Percentage::from(1.00), rupees(200), rupees(1500)),
        Promotion::new("CARNIVAL", Percentage::from(1.00), rupees(175), rupees(0)),
        Promotion::new("ONECARD", Percentage::from(1.00), rupees(30), rupees(299)),
    ]
}

/// User-visible promotion failures. Non-fatal; the user may retry
/// immediately.
#[derive(Debug, Error)]
pub enum PromotionError {
    /// The submitted code is not in the offer table.
    #[error("invalid promo code")]
    InvalidCode,

    /// The cart subtotal has not reached the offer's floor.
    #[error("min order {minimum} required for this code")]
    BelowMinimum {
        /// Spend required before the code becomes eligible.
        minimum: Money<'static, Currency>,
    },

    /// Discount arithmetic could not be represented.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A promotion that passed eligibility, with its discount fixed at
/// apply-time.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromotion {
    code: String,
    discount: Money<'static, Currency>,
}

impl AppliedPromotion {
    /// The normalized code that was applied.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The discount locked in when the code was applied.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.discount
    }
}

/// State machine over the single active promotion.
///
/// The discount is computed once when a code is applied and held until
/// the next apply or clear; it is deliberately not refreshed when the
/// cart changes afterwards. Re-submitting a code recomputes it against
/// the subtotal of that moment.
#[derive(Debug)]
pub struct PromotionEvaluator {
    offers: FxHashMap<String, Promotion>,
    active: Option<AppliedPromotion>,
}

impl PromotionEvaluator {
    /// Evaluator over the standing offer table.
    pub fn new() -> Self {
        Self::with_offers(standing_offers())
    }

    /// Evaluator over a custom offer table.
    pub fn with_offers(offers: impl IntoIterator<Item = Promotion>) -> Self {
        let offers = offers
            .into_iter()
            .map(|offer| (offer.code().to_uppercase(), offer))
            .collect();

        Self {
            offers,
            active: None,
        }
    }

    /// Submit a code against the current subtotal.
    ///
    /// Input is trimmed and uppercased before lookup. Empty input clears
    /// the active promotion and succeeds with `None`. Any failure also
    /// clears it; at most one promotion is active, and a successful apply
    /// replaces the previous one.
    ///
    /// # Errors
    ///
    /// - [`PromotionError::InvalidCode`] for a non-empty unknown code.
    /// - [`PromotionError::BelowMinimum`] when the subtotal is under the
    ///   offer's floor; the error names the required minimum.
    /// - [`PromotionError::Pricing`] if the discount cannot be computed.
    pub fn apply(
        &mut self,
        input: &str,
        subtotal: Money<'static, Currency>,
    ) -> Result<Option<AppliedPromotion>, PromotionError> {
        self.active = None;

        let code = input.trim().to_uppercase();
        if code.is_empty() {
            return Ok(None);
        }

        let Some(offer) = self.offers.get(&code) else {
            return Err(PromotionError::InvalidCode);
        };

        if subtotal.to_minor_units() < offer.min_order().to_minor_units() {
            return Err(PromotionError::BelowMinimum {
                minimum: offer.min_order(),
            });
        }

        let percent_minor = percent_of_rupees(&offer.percent_off(), subtotal.to_minor_units())?;
        let discount_minor = percent_minor.min(offer.max_discount().to_minor_units());

        let applied = AppliedPromotion {
            code,
            discount: Money::from_minor(discount_minor, iso::INR),
        };

        self.active = Some(applied.clone());

        Ok(Some(applied))
    }

    /// The active promotion, if any.
    pub fn active(&self) -> Option<&AppliedPromotion> {
        self.active.as_ref()
    }

    /// The held discount; zero when no promotion is active.
    pub fn discount(&self) -> Money<'static, Currency> {
        self.active
            .as_ref()
            .map_or_else(|| rupees(0), AppliedPromotion::discount)
    }

    /// Drop the active promotion and its held discount.
    pub fn clear(&mut self) {
        self.active = None;
    }
}

impl Default for PromotionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

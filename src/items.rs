//! Line items

use std::{collections::BTreeSet, fmt};

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Portion size for a menu selection.
///
/// `Regular` covers single-size items such as sides and drinks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Size {
    /// Small portion.
    Small,

    /// Medium portion.
    Medium,

    /// Large portion.
    Large,

    /// The only portion an item comes in.
    Regular,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Size::Small => "Small",
            Size::Medium => "Medium",
            Size::Large => "Large",
            Size::Regular => "Regular",
        };

        f.write_str(label)
    }
}

/// One customizable, quantity-bearing entry in the cart.
///
/// Name and unit price are copied from the catalog at add-time and never
/// re-fetched afterwards. Quantity is at least 1 at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    catalog_id: u32,
    name: String,
    size: Size,
    toppings: Vec<String>,
    unit_price: Money<'static, Currency>,
    quantity: u32,
}

impl LineItem {
    /// Create a new line item. Quantities below 1 are clamped to 1.
    pub fn new(
        catalog_id: u32,
        name: impl Into<String>,
        size: Size,
        toppings: Vec<String>,
        unit_price: Money<'static, Currency>,
        quantity: u32,
    ) -> Self {
        Self {
            catalog_id,
            name: name.into(),
            size,
            toppings,
            unit_price,
            quantity: quantity.max(1),
        }
    }

    /// Catalog id of the underlying menu entry. Not unique within a cart.
    pub fn catalog_id(&self) -> u32 {
        self.catalog_id
    }

    /// Display name copied at add-time.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Portion size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Chosen toppings, in display order.
    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    /// Price per unit, fixed at add-time.
    pub fn unit_price(&self) -> Money<'static, Currency> {
        self.unit_price
    }

    /// Units of this selection.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Extended price for this entry.
    pub fn line_total(&self) -> Money<'static, Currency> {
        Money::from_minor(
            self.unit_price.to_minor_units() * i64::from(self.quantity),
            self.unit_price.currency(),
        )
    }

    /// Whether two entries are the same logical selection.
    ///
    /// Identity is the (catalog id, size, topping set) tuple; topping
    /// order never matters.
    pub fn same_selection(&self, other: &Self) -> bool {
        self.catalog_id == other.catalog_id
            && self.size == other.size
            && self.topping_set() == other.topping_set()
    }

    fn topping_set(&self) -> BTreeSet<&str> {
        self.toppings.iter().map(String::as_str).collect()
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    pub(crate) fn add_quantity(&mut self, extra: u32) {
        self.quantity = self.quantity.saturating_add(extra);
    }

    pub(crate) fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub(crate) fn set_toppings(&mut self, toppings: Vec<String>) {
        self.toppings = toppings;
    }
}

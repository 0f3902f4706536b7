//! Catalog

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    items::{LineItem, Size},
    pricing::rupees,
};

/// Catalog parsing errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing error.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_norway::Error),

    /// Two entries share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(u32),
}

/// Wrapper for catalog entries in YAML.
#[derive(Debug, Deserialize)]
struct CatalogFixture {
    /// Entries in menu order.
    items: Vec<EntryFixture>,
}

/// One catalog entry as it appears in YAML.
#[derive(Debug, Deserialize)]
struct EntryFixture {
    id: u32,
    name: String,
    #[serde(default)]
    description: String,
    /// Price in whole rupees.
    price: i64,
    #[serde(default)]
    sizes: Vec<Size>,
    #[serde(default)]
    toppings: Vec<String>,
    category: String,
}

/// An immutable menu entry supplied by the catalog provider.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    id: u32,
    name: String,
    description: String,
    base_price: Money<'static, Currency>,
    sizes: Vec<Size>,
    toppings: Vec<String>,
    category: String,
}

impl CatalogEntry {
    /// Catalog id.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Menu description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Base price before any customization.
    pub fn base_price(&self) -> Money<'static, Currency> {
        self.base_price
    }

    /// Sizes this entry is offered in; empty for single-size items.
    pub fn sizes(&self) -> &[Size] {
        &self.sizes
    }

    /// Toppings this entry can carry.
    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    /// Menu category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Build a cart candidate from this entry, copying the name and base
    /// price at add-time.
    pub fn line_item(&self, size: Size, toppings: Vec<String>, quantity: u32) -> LineItem {
        LineItem::new(
            self.id,
            self.name.clone(),
            size,
            toppings,
            self.base_price,
            quantity,
        )
    }
}

/// Read-only menu snapshot, fetched once per session and never mutated by
/// the cart engine.
#[derive(Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: FxHashMap<u32, usize>,
}

impl Catalog {
    /// Parse a catalog from its YAML form.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML is malformed or two entries
    /// share an id.
    pub fn from_yaml(contents: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(contents)?;

        let mut entries = Vec::with_capacity(fixture.items.len());
        let mut index = FxHashMap::default();

        for item in fixture.items {
            if index.contains_key(&item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }

            index.insert(item.id, entries.len());

            entries.push(CatalogEntry {
                id: item.id,
                name: item.name,
                description: item.description,
                base_price: rupees(item.price),
                sizes: item.sizes,
                toppings: item.toppings,
                category: item.category,
            });
        }

        Ok(Self { entries, index })
    }

    /// Look up an entry by catalog id.
    pub fn get(&self, id: u32) -> Option<&CatalogEntry> {
        self.index.get(&id).and_then(|position| self.entries.get(*position))
    }

    /// All entries in menu order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const DEMO_MENU: &str = include_str!("../fixtures/menu.yml");

    #[test]
    fn demo_menu_loads() -> TestResult {
        let catalog = Catalog::from_yaml(DEMO_MENU)?;

        assert!(!catalog.is_empty());

        let margherita = catalog.get(8).ok_or("expected Margherita at id 8")?;

        assert_eq!(margherita.name(), "Margherita");
        assert_eq!(margherita.base_price(), rupees(1078));
        assert_eq!(margherita.category(), "vegetarian");
        assert_eq!(margherita.sizes().len(), 3);

        Ok(())
    }

    #[test]
    fn single_size_items_default_to_no_sizes() -> TestResult {
        let catalog = Catalog::from_yaml(DEMO_MENU)?;

        let water = catalog.get(7).ok_or("expected Kinley Water at id 7")?;

        assert!(water.sizes().is_empty());
        assert!(water.toppings().is_empty());

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = "items:\n  - id: 1\n    name: One\n    price: 100\n    category: sides\n  - id: 1\n    name: Two\n    price: 200\n    category: sides\n";

        let result = Catalog::from_yaml(yaml);

        assert!(matches!(result, Err(CatalogError::DuplicateId(1))));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let result = Catalog::from_yaml("items: [not: a: list");

        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn line_item_copies_name_and_price_at_add_time() -> TestResult {
        let catalog = Catalog::from_yaml(DEMO_MENU)?;
        let entry = catalog.get(8).ok_or("expected Margherita at id 8")?;

        let item = entry.line_item(Size::Medium, vec!["Extra Cheese".to_string()], 2);

        assert_eq!(item.catalog_id(), 8);
        assert_eq!(item.name(), "Margherita");
        assert_eq!(item.unit_price(), rupees(1078));
        assert_eq!(item.quantity(), 2);

        Ok(())
    }

    #[test]
    fn get_unknown_id_returns_none() -> TestResult {
        let catalog = Catalog::from_yaml(DEMO_MENU)?;

        assert!(catalog.get(9999).is_none());

        Ok(())
    }
}

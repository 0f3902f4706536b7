//! Session records

use serde::{Deserialize, Serialize};

use crate::{
    items::{LineItem, Size},
    pricing::rupees,
};

/// Serialized shape of one cart entry.
///
/// Field names match the payloads earlier storefront sessions wrote, so
/// existing carts keep loading across upgrades.
#[derive(Debug, Serialize, Deserialize)]
pub struct LineItemRecord {
    /// Catalog id of the underlying menu entry.
    pub id: u32,

    /// Display name copied at add-time.
    pub name: String,

    /// Portion size.
    pub size: Size,

    /// Chosen toppings in display order.
    pub toppings: Vec<String>,

    /// Unit price in whole rupees.
    pub price: i64,

    /// Units of this selection.
    pub quantity: u32,
}

impl From<&LineItem> for LineItemRecord {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.catalog_id(),
            name: item.name().to_string(),
            size: item.size(),
            toppings: item.toppings().to_vec(),
            price: item.unit_price().to_minor_units() / 100,
            quantity: item.quantity(),
        }
    }
}

impl From<LineItemRecord> for LineItem {
    fn from(record: LineItemRecord) -> Self {
        LineItem::new(
            record.id,
            record.name,
            record.size,
            record.toppings,
            rupees(record.price),
            record.quantity,
        )
    }
}

/// Encode cart entries for the persistence bridge.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if encoding fails.
pub fn encode_items(items: &[LineItem]) -> Result<String, serde_json::Error> {
    let records: Vec<LineItemRecord> = items.iter().map(LineItemRecord::from).collect();

    serde_json::to_string(&records)
}

/// Decode cart entries previously written by [`encode_items`].
///
/// # Errors
///
/// Returns a [`serde_json::Error`] for malformed payloads; callers treat
/// that as an empty session rather than an error.
pub fn decode_items(payload: &str) -> Result<Vec<LineItem>, serde_json::Error> {
    let records: Vec<LineItemRecord> = serde_json::from_str(payload)?;

    Ok(records.into_iter().map(LineItem::from).collect())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn farmhouse() -> LineItem {
        LineItem::new(
            10,
            "Farm House",
            Size::Large,
            vec!["Extra Onions".to_string(), "Extra Cheese".to_string()],
            rupees(1327),
            2,
        )
    }

    #[test]
    fn encode_decode_round_trips() -> TestResult {
        let items = vec![farmhouse()];

        let payload = encode_items(&items)?;
        let restored = decode_items(&payload)?;

        assert_eq!(restored, items);

        Ok(())
    }

    #[test]
    fn payload_uses_storefront_field_names() -> TestResult {
        let payload = encode_items(&[farmhouse()])?;

        assert!(payload.contains("\"id\":10"));
        assert!(payload.contains("\"price\":1327"));
        assert!(payload.contains("\"size\":\"Large\""));
        assert!(payload.contains("\"quantity\":2"));

        Ok(())
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        assert!(decode_items("not json").is_err());
        assert!(decode_items("{\"id\":1}").is_err());
    }

    #[test]
    fn decode_rejects_unknown_sizes() {
        let payload = "[{\"id\":1,\"name\":\"X\",\"size\":\"\",\"toppings\":[],\"price\":100,\"quantity\":1}]";

        assert!(decode_items(payload).is_err());
    }

    #[test]
    fn decoded_quantities_are_clamped() -> TestResult {
        let payload = "[{\"id\":1,\"name\":\"X\",\"size\":\"Regular\",\"toppings\":[],\"price\":100,\"quantity\":0}]";

        let items = decode_items(payload)?;
        let first = items.first().ok_or("expected one item")?;

        assert_eq!(first.quantity(), 1);

        Ok(())
    }
}

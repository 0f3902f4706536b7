//! Tiffin prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::CartStore,
    catalog::{Catalog, CatalogEntry, CatalogError},
    checkout::{CheckoutError, OrderSnapshot, assemble},
    items::{LineItem, Size},
    pricing::{PricingBreakdown, PricingError, estimated_delivery_minutes, quote, rupees},
    promotions::{
        AppliedPromotion, Promotion, PromotionError, PromotionEvaluator, standing_offers,
    },
    receipt::{ReceiptError, write_receipt},
    store::{FileStore, KeyValueStore, MemoryStore, StoreError, debounce::DebouncedWriter},
};

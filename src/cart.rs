//! Cart

use std::time::Duration;

use tracing::warn;

use crate::{
    items::{LineItem, Size},
    store::{KeyValueStore, debounce::DebouncedWriter, keys, records},
};

/// Quiet window before coalesced session writes hit the store.
const DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

/// The session's cart and saved-for-later lists.
///
/// Owns its state outright: create one per session and pass it to
/// whatever needs it. An item lives in exactly one of the two lists at a
/// time. Every mutation schedules a best-effort, debounced write of the
/// affected list to the backing store so the session survives a reload;
/// persistence failures never reach the caller.
#[derive(Debug)]
pub struct CartStore {
    items: Vec<LineItem>,
    saved: Vec<LineItem>,
    promo_code: Option<String>,
    session: DebouncedWriter,
}

impl CartStore {
    /// Open a session against the given store, restoring any cart, saved
    /// list, and promo code a previous session left behind.
    ///
    /// Payloads that fail to decode are discarded: a fresh session starts
    /// empty rather than failing.
    pub fn open(store: impl KeyValueStore) -> Self {
        let items = Self::restore(&store, keys::CART_ITEMS);
        let saved = Self::restore(&store, keys::SAVED_FOR_LATER);
        let promo_code = store.get(keys::PROMO_CODE).filter(|code| !code.is_empty());

        Self {
            items,
            saved,
            promo_code,
            session: DebouncedWriter::spawn(store, DEBOUNCE_WINDOW),
        }
    }

    fn restore(store: &impl KeyValueStore, key: &'static str) -> Vec<LineItem> {
        let Some(payload) = store.get(key) else {
            return Vec::new();
        };

        match records::decode_items(&payload) {
            Ok(items) => items,
            Err(error) => {
                warn!(key, %error, "discarding undecodable session payload");
                Vec::new()
            }
        }
    }

    /// Add a candidate to the cart.
    ///
    /// An existing entry with the same selection absorbs the candidate's
    /// quantity; otherwise the candidate is appended, preserving
    /// insertion order. Always succeeds.
    pub fn add(&mut self, item: LineItem) {
        match self
            .items
            .iter_mut()
            .find(|existing| existing.same_selection(&item))
        {
            Some(existing) => existing.add_quantity(item.quantity()),
            None => self.items.push(item),
        }

        self.persist_cart();
    }

    /// Remove the first entry with the given catalog id. Absent ids are
    /// ignored.
    pub fn remove(&mut self, catalog_id: u32) {
        if let Some(position) = self.position(catalog_id) {
            self.items.remove(position);
            self.persist_cart();
        }
    }

    /// Adjust an entry's quantity by a signed delta, never below 1.
    /// Absent ids are ignored.
    pub fn update_quantity(&mut self, catalog_id: u32, delta: i32) {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.catalog_id() == catalog_id)
        else {
            return;
        };

        let next = (i64::from(item.quantity()) + i64::from(delta)).max(1);
        item.set_quantity(u32::try_from(next).unwrap_or(u32::MAX));

        self.persist_cart();
    }

    /// Replace the stated attributes on the first entry with the given
    /// id. Absent ids are ignored.
    ///
    /// Entries are not re-merged afterwards: an edit can leave two
    /// entries with identical selections, and they stay separate until
    /// one is removed. This mirrors the storefront's observed behavior.
    pub fn update_attributes(
        &mut self,
        catalog_id: u32,
        size: Option<Size>,
        toppings: Option<Vec<String>>,
    ) {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.catalog_id() == catalog_id)
        else {
            return;
        };

        if let Some(size) = size {
            item.set_size(size);
        }

        if let Some(toppings) = toppings {
            item.set_toppings(toppings);
        }

        self.persist_cart();
    }

    /// Empty the cart unconditionally.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist_cart();
    }

    /// Move one cart entry to the saved-for-later list.
    ///
    /// The entry is appended to the saved list before it leaves the
    /// cart, so an interrupted transfer duplicates nothing and loses
    /// nothing. Absent ids are ignored.
    pub fn move_to_saved(&mut self, catalog_id: u32) {
        let Some(position) = self.position(catalog_id) else {
            return;
        };

        let Some(item) = self.items.get(position).cloned() else {
            return;
        };

        self.saved.push(item);
        self.items.remove(position);

        self.persist_cart();
        self.persist_saved();
    }

    /// Move one saved entry back into the cart, merging like [`add`].
    /// Absent ids are ignored.
    ///
    /// [`add`]: CartStore::add
    pub fn move_to_cart(&mut self, catalog_id: u32) {
        let Some(position) = self
            .saved
            .iter()
            .position(|item| item.catalog_id() == catalog_id)
        else {
            return;
        };

        let Some(item) = self.saved.get(position).cloned() else {
            return;
        };

        self.add(item);
        self.saved.remove(position);

        self.persist_saved();
    }

    /// Drop a saved entry without returning it to the cart. Absent ids
    /// are ignored.
    pub fn remove_saved(&mut self, catalog_id: u32) {
        if let Some(position) = self
            .saved
            .iter()
            .position(|item| item.catalog_id() == catalog_id)
        {
            self.saved.remove(position);
            self.persist_saved();
        }
    }

    /// Remember the promo code text the user last submitted.
    pub fn set_promo_code(&mut self, code: Option<String>) {
        self.promo_code = code;

        self.session.schedule(
            keys::PROMO_CODE,
            self.promo_code.clone().unwrap_or_default(),
        );
    }

    /// The promo code text restored from or recorded during this session.
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    /// Current cart entries, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Saved-for-later entries.
    pub fn saved(&self) -> &[LineItem] {
        &self.saved
    }

    /// Whether the cart has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of cart entries (not units).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Block until scheduled session writes have reached the store.
    pub fn flush(&self) {
        self.session.flush();
    }

    fn position(&self, catalog_id: u32) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.catalog_id() == catalog_id)
    }

    fn persist_cart(&self) {
        self.persist(keys::CART_ITEMS, &self.items);
    }

    fn persist_saved(&self) {
        self.persist(keys::SAVED_FOR_LATER, &self.saved);
    }

    fn persist(&self, key: &'static str, items: &[LineItem]) {
        match records::encode_items(items) {
            Ok(payload) => self.session.schedule(key, payload),
            Err(error) => warn!(key, %error, "failed to encode session payload; skipping write"),
        }
    }
}

//! Session persistence across reloads.
//!
//! A reload is modeled as dropping one `CartStore` and opening another
//! over the same backing store.

use anyhow::Result;

use tiffin::{
    cart::CartStore,
    items::{LineItem, Size},
    pricing::rupees,
    store::{FileStore, KeyValueStore, MemoryStore, keys},
};

fn farmhouse(quantity: u32) -> LineItem {
    LineItem::new(
        10,
        "Farm House",
        Size::Large,
        vec!["Extra Onions".to_string(), "Extra Cheese".to_string()],
        rupees(1327),
        quantity,
    )
}

#[test]
fn a_session_survives_a_reload() -> Result<()> {
    let store = MemoryStore::new();

    {
        let mut cart = CartStore::open(store.clone());

        cart.add(farmhouse(2));
        cart.add(LineItem::new(
            7,
            "Kinley Water",
            Size::Regular,
            Vec::new(),
            rupees(165),
            1,
        ));
        cart.move_to_saved(7);
        cart.set_promo_code(Some("TRYNEW".to_string()));
        // Dropping the cart flushes the debounced writer.
    }

    let restored = CartStore::open(store);

    assert_eq!(restored.len(), 1);
    assert_eq!(restored.items(), &[farmhouse(2)]);
    assert_eq!(restored.saved().len(), 1);
    assert_eq!(
        restored.saved().first().map(LineItem::name),
        Some("Kinley Water")
    );
    assert_eq!(restored.promo_code(), Some("TRYNEW"));

    Ok(())
}

#[test]
fn a_corrupt_payload_degrades_to_an_empty_session() -> Result<()> {
    let mut store = MemoryStore::new();

    store.put(keys::CART_ITEMS, "{{{")?;
    store.put(keys::SAVED_FOR_LATER, "[{\"id\":true}]")?;

    let cart = CartStore::open(store);

    assert!(cart.is_empty());
    assert!(cart.saved().is_empty());

    Ok(())
}

#[test]
fn a_file_backed_session_survives_a_reload() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    {
        let mut cart = CartStore::open(FileStore::new(&path));

        cart.add(farmhouse(1));
        cart.flush();
    }

    let restored = CartStore::open(FileStore::new(&path));

    assert_eq!(restored.items(), &[farmhouse(1)]);

    Ok(())
}

#[test]
fn clearing_the_cart_persists_the_empty_state() -> Result<()> {
    let store = MemoryStore::new();

    {
        let mut cart = CartStore::open(store.clone());

        cart.add(farmhouse(1));
        cart.clear();
    }

    let restored = CartStore::open(store);

    assert!(restored.is_empty());

    Ok(())
}

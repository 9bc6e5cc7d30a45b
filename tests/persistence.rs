//! Write-through persistence across sessions.

use std::{collections::BTreeMap, sync::Arc};

use rust_decimal::Decimal;
use testresult::TestResult;

use forecourt::{
    fixtures,
    prelude::*,
    store::{self, keys},
};

fn file_store(dir: &std::path::Path) -> TestResult<Arc<dyn Store>> {
    let store: Arc<dyn Store> = Arc::new(JsonFileStore::open(dir)?);
    fixtures::initialize(store.as_ref())?;
    Ok(store)
}

#[test]
fn a_second_session_sees_the_first_sessions_state() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = file_store(dir.path())?;

    let mut first = Session::start(Arc::clone(&store));
    first.login("mp", "2001")?;
    first.add_to_cart("car-1", vec!["addon-sport-1".to_owned()], BTreeMap::new())?;
    let outcome = first.apply_discount("car-1", 20, "123456")?;
    assert!(outcome.is_granted(), "expected a grant, got {outcome:?}");
    first.set_discounts_management(false)?;

    let second = Session::start(store);

    assert_eq!(second.cart().len(), 1, "the cart snapshot must survive");
    let line = second.cart().line("car-1");
    assert_eq!(
        line.and_then(|item| item.discount.as_ref()).map(|g| g.percentage),
        Some(20)
    );
    assert_eq!(second.log().len(), 1, "the log snapshot must survive");
    assert!(
        !second.settings().show_discounts_management,
        "the settings snapshot must survive"
    );
    assert_eq!(
        second.actor().map(|actor| actor.role),
        Some(Role::Admin),
        "the signed-in user must survive"
    );

    Ok(())
}

#[test]
fn every_mutation_is_persisted_before_returning() -> TestResult {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    fixtures::initialize(store.as_ref())?;

    let mut session = Session::start(Arc::clone(&store));
    session.add_to_cart("car-2", Vec::new(), BTreeMap::new())?;

    let persisted: Cart = store::load(store.as_ref(), keys::CART, Cart::new());
    assert_eq!(persisted.len(), 1, "add must write through immediately");

    session.remove_from_cart("car-2")?;
    let persisted: Cart = store::load(store.as_ref(), keys::CART, Cart::new());
    assert!(persisted.is_empty(), "remove must write through immediately");

    Ok(())
}

#[test]
fn a_corrupt_cart_snapshot_falls_back_to_an_empty_cart() -> TestResult {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    fixtures::initialize(store.as_ref())?;
    store.put(keys::CART, "{definitely not json".to_owned())?;

    let session = Session::start(store);

    assert!(session.cart().is_empty(), "corruption must recover to the default");
    assert_eq!(session.cart_total(), Decimal::ZERO);

    Ok(())
}

#[test]
fn a_corrupt_log_snapshot_does_not_block_the_session() -> TestResult {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    fixtures::initialize(store.as_ref())?;
    store.put(keys::DISCOUNTS_LOG, "[1, 2".to_owned())?;

    let mut session = Session::start(store);
    session.login("mp", "2001")?;
    session.add_to_cart("car-1", Vec::new(), BTreeMap::new())?;
    let outcome = session.apply_discount("car-1", 10, "123456")?;

    assert!(outcome.is_granted(), "expected a grant, got {outcome:?}");
    assert_eq!(session.log().len(), 1, "the recovered log starts fresh");

    Ok(())
}

#[test]
fn checkout_clears_the_persisted_cart_too() -> TestResult {
    let dir = tempfile::tempdir()?;
    let store = file_store(dir.path())?;

    let mut session = Session::start(Arc::clone(&store));
    session.add_to_cart("car-4", Vec::new(), BTreeMap::new())?;
    session.begin_checkout()?;
    session.complete_checkout()?;

    let restored = Session::start(store);
    assert!(restored.cart().is_empty(), "the cleared cart must be durable");

    Ok(())
}

//! Price-setting operations either land completely or not at all.

use jiff::Timestamp;
use procura::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use testresult::TestResult;

type TestEngine = PriceEngine<MemoryStore, ManualClock>;

struct Setup {
    engine: TestEngine,
    product: Product,
    vendor: Vendor,
    alert: PriceAlert,
}

fn setup() -> TestResult<Setup> {
    let start: Timestamp = "2025-01-15T09:00:00Z".parse()?;
    let mut engine = PriceEngine::with_clock(MemoryStore::new(), ManualClock::new(start));

    let product = engine.create_product("MacBook Air", "Apple", None)?;
    let vendor = engine.create_vendor(NewVendor {
        name: "Amazon".to_string(),
        currency: CurrencyCode::USD,
        discount_code: None,
        discount: None,
    })?;
    let alert = engine.create_alert(product.id, dec!(900), CurrencyCode::USD)?;

    Ok(Setup {
        engine,
        product,
        vendor,
        alert,
    })
}

fn offer(setup: &Setup, price: Decimal) -> NewQuote {
    NewQuote {
        vendor: setup.vendor.id,
        product: setup.product.id,
        price,
        discount: None,
        shipping_cost: None,
        tax_rate: None,
        status: None,
    }
}

fn is_persistence<T: std::fmt::Debug>(result: &Result<T, EngineError>) -> bool {
    matches!(result, Err(EngineError::Persistence(_)))
}

#[test]
fn failed_alert_update_discards_new_quote() -> TestResult {
    let mut setup = setup()?;

    // quote and history go through, the alert update does not
    setup.engine.store_mut().fail_writes_after(2);

    let result = setup.engine.create_quote(offer(&setup, dec!(850)));

    assert!(is_persistence(&result), "expected persistence error: {result:?}");

    setup.engine.store_mut().clear_write_failures();

    assert!(setup.engine.store().quotes()?.is_empty());
    assert!(
        setup
            .engine
            .store()
            .history_for_product(setup.product.id)?
            .is_empty()
    );
    assert!(setup.engine.triggered_alerts()?.is_empty());

    Ok(())
}

#[test]
fn failed_history_write_keeps_old_price() -> TestResult {
    let mut setup = setup()?;

    let quote = setup.engine.create_quote(offer(&setup, dec!(999)))?.quote;

    setup.engine.store_mut().fail_writes_after(1);

    let result = setup.engine.update_price(quote.id, dec!(899));

    assert!(is_persistence(&result), "expected persistence error: {result:?}");

    setup.engine.store_mut().clear_write_failures();

    assert_eq!(setup.engine.quote(quote.id)?.value, dec!(999));
    assert_eq!(setup.engine.history(quote.id)?.len(), 1);
    assert_eq!(setup.engine.trend(quote.id)?, Trend::New);

    let alert = setup.engine.store().alert(setup.alert.id)?;

    assert_eq!(alert.and_then(|alert| alert.triggered_at), None);

    // once the store recovers the same update goes through
    let retried = setup.engine.update_price(quote.id, dec!(899))?;

    assert_eq!(retried.triggered.len(), 1);
    assert_eq!(setup.engine.history(quote.id)?.len(), 2);

    Ok(())
}

#[test]
fn offline_store_surfaces_persistence_errors() -> TestResult {
    let mut setup = setup()?;

    let quote = setup.engine.create_quote(offer(&setup, dec!(999)))?.quote;

    setup.engine.store_mut().set_offline(true);

    let update = setup.engine.update_price(quote.id, dec!(899));
    let create = setup.engine.create_quote(offer(&setup, dec!(899)));
    let read = setup.engine.best_prices(None);

    assert!(is_persistence(&update), "update: {update:?}");
    assert!(is_persistence(&create), "create: {create:?}");
    assert!(is_persistence(&read), "read: {read:?}");

    setup.engine.store_mut().set_offline(false);

    assert_eq!(setup.engine.quote(quote.id)?.value, dec!(999));
    assert_eq!(setup.engine.store().quotes()?.len(), 1);

    Ok(())
}

#[test]
fn validation_failures_write_nothing() -> TestResult {
    let mut setup = setup()?;

    let mut bad = offer(&setup, dec!(999));
    bad.discount = Some(dec!(120));

    let result = setup.engine.create_quote(bad);

    assert!(
        matches!(result, Err(EngineError::Validation(_))),
        "expected validation error: {result:?}"
    );
    assert!(setup.engine.store().quotes()?.is_empty());

    let quote = setup.engine.create_quote(offer(&setup, dec!(999)))?.quote;
    let negative = setup.engine.update_price(quote.id, dec!(-1));

    assert!(
        matches!(negative, Err(EngineError::Validation(_))),
        "expected validation error: {negative:?}"
    );
    assert_eq!(setup.engine.history(quote.id)?.len(), 1);

    Ok(())
}

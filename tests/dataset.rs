//! Loading YAML datasets into an engine.

use std::{io::Write, path::Path};

use jiff::Timestamp;
use procura::prelude::*;
use rust_decimal_macros::dec;
use testresult::TestResult;

fn engine() -> Result<PriceEngine<MemoryStore, ManualClock>, jiff::Error> {
    let start: Timestamp = "2025-01-15T09:00:00Z".parse()?;

    Ok(PriceEngine::with_clock(
        MemoryStore::new(),
        ManualClock::new(start),
    ))
}

#[test]
fn demo_dataset_loads() -> TestResult {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.yml");
    let dataset = Dataset::from_file(&path)?;

    let mut engine = engine()?;
    let loaded = dataset.load_into(&mut engine)?;

    assert_eq!(loaded.products.len(), 5);
    assert_eq!(loaded.vendors.len(), 4);
    assert_eq!(loaded.quotes.len(), 10);
    assert_eq!(loaded.alerts.len(), 3);

    // Amazon's MacBook Air went 999 -> 949 -> 899.
    let air = loaded.product("air")?;
    let amazon = loaded.vendor("amazon")?;

    let quote = engine
        .quotes_for_product(air)?
        .into_iter()
        .find(|quote| quote.vendor == amazon);

    assert_eq!(quote.as_ref().map(|quote| quote.value), Some(dec!(899)));

    if let Some(quote) = quote {
        assert_eq!(engine.history(quote.id)?.len(), 3);
        assert_eq!(engine.trend(quote.id)?, Trend::Down);
    }

    // Fnac's 899 EUR converts with the 2025-01-10 snapshot.
    let fnac = loaded.vendor("fnac")?;
    let converted = engine
        .quotes_for_product(air)?
        .into_iter()
        .find(|quote| quote.vendor == fnac)
        .map(|quote| quote.value);

    assert_eq!(converted, Some(dec!(988.90)));

    // The air and mouse alerts fired; the XPS never dropped to 800.
    let triggered: Vec<ProductId> = engine
        .triggered_alerts()?
        .into_iter()
        .map(|alert| alert.product)
        .collect();

    assert_eq!(triggered.len(), 2);
    assert!(triggered.contains(&air), "air alert should fire");
    assert!(
        !triggered.contains(&loaded.product("xps")?),
        "xps alert should stay armed"
    );

    let best = engine.best_prices(None)?;

    assert_eq!(best.get(&air).map(|quote| quote.value), Some(dec!(899)));

    // Home office: the Amazon air with 8.25% tax plus the dock at B&H's 10% off.
    assert_eq!(loaded.purchase_lists.len(), 1);
    assert_eq!(engine.purchase_list_quotes("Home office")?.len(), 2);
    assert_eq!(
        engine.purchase_list_total("Home office")?,
        Some(dec!(1233.2675))
    );

    Ok(())
}

#[test]
fn dataset_file_from_disk() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;

    write!(
        file,
        r#"
rates:
  - code: GBP
    usd_per_unit: "1.25"
    date: 2025-01-10

products:
  mx:
    name: MX Master 3S
    brand: Logitech

vendors:
  currys:
    name: Currys
    currency: GBP

quotes:
  - vendor: currys
    product: mx
    price: "80 GBP"
    status: ordered
"#
    )?;

    let dataset = Dataset::from_file(file.path())?;

    let mut engine = engine()?;
    let loaded = dataset.load_into(&mut engine)?;

    let ordered = engine.quotes_by_status(QuoteStatus::Ordered)?;

    assert_eq!(
        ordered.iter().map(|quote| quote.id).collect::<Vec<_>>(),
        loaded.quotes
    );
    assert_eq!(
        ordered.iter().map(|quote| quote.value).collect::<Vec<_>>(),
        vec![dec!(100)]
    );

    Ok(())
}

#[test]
fn unknown_product_key_is_reported() -> TestResult {
    let dataset = Dataset::from_yaml(
        r#"
vendors:
  amazon:
    name: Amazon
    currency: USD

quotes:
  - vendor: amazon
    product: missing
    price: "10 USD"
"#,
    )?;

    let mut engine = engine()?;
    let result = dataset.load_into(&mut engine);

    assert!(
        matches!(result, Err(FixtureError::ProductNotFound(ref key)) if key == "missing"),
        "unexpected result: {result:?}"
    );

    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let result = Dataset::from_file("does/not/exist.yml");

    assert!(
        matches!(result, Err(FixtureError::Io(_))),
        "unexpected result: {result:?}"
    );
}

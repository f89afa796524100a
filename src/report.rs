//! Report

use std::{collections::BTreeMap, io};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    alerts::PriceAlert,
    comparison::ProductComparison,
    currency::{CurrencyCode, format_amount},
    history::{HistoryEntry, Trend},
    lists::{PurchaseList, total_value},
    models::{Product, ProductId, Quote, Vendor, VendorId},
};

/// Errors that can occur when rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A quote references a vendor that was not supplied.
    #[error("vendor {0} missing from report input")]
    MissingVendor(VendorId),

    /// A row references a product that was not supplied.
    #[error("product {0} missing from report input")]
    MissingProduct(ProductId),

    /// Writing the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Quotes of one product with a best/worst/average summary.
///
/// # Errors
///
/// Returns an error if a quote's vendor is not in `vendors` or writing fails.
pub fn write_comparison(
    mut out: impl io::Write,
    comparison: &ProductComparison,
    vendors: &[Vendor],
) -> Result<(), ReportError> {
    let vendors = index_vendors(vendors);

    writeln!(out, "{}", comparison.product.name)?;

    if !comparison.has_quotes() {
        writeln!(out, "  no quotes")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Vendor", "Price", "Original", "Total", "Status"]);

    for quote in &comparison.quotes {
        let vendor = vendor_for(&vendors, quote)?;

        builder.push_record([
            quote.id.to_string(),
            vendor.name.clone(),
            usd(quote.value),
            quote
                .original
                .map(|original| format_amount(original.value, original.currency))
                .unwrap_or_default(),
            quote.total_cost().map(usd).unwrap_or_default(),
            quote.status.map(|s| s.to_string()).unwrap_or_default(),
        ]);
    }

    write_table(&mut out, builder, 2..5)?;

    let summary = [
        ("Best", comparison.best_price),
        ("Worst", comparison.worst_price),
        ("Average", comparison.avg_price),
        ("Savings", comparison.savings),
    ];

    for (label, value) in summary {
        if let Some(value) = value {
            writeln!(out, " {label:>8}: {}", usd(value))?;
        }
    }

    writeln!(out, " {:>8}: {}", "Vendors", comparison.vendor_count())?;

    Ok(())
}

/// Several comparisons, one after another.
///
/// # Errors
///
/// See [`write_comparison`].
pub fn write_comparisons(
    mut out: impl io::Write,
    comparisons: &[ProductComparison],
    vendors: &[Vendor],
) -> Result<(), ReportError> {
    for comparison in comparisons {
        write_comparison(&mut out, comparison, vendors)?;
        writeln!(out)?;
    }

    writeln!(out, "{} product(s)", comparisons.len())?;

    Ok(())
}

/// One row per product with its cheapest quote.
///
/// # Errors
///
/// Returns an error if a product or vendor is not supplied or writing fails.
pub fn write_best_prices(
    mut out: impl io::Write,
    best: &BTreeMap<ProductId, Quote>,
    products: &[Product],
    vendors: &[Vendor],
) -> Result<(), ReportError> {
    let products: FxHashMap<ProductId, &Product> =
        products.iter().map(|product| (product.id, product)).collect();
    let vendors = index_vendors(vendors);

    let mut builder = Builder::default();

    builder.push_record(["Product", "Category", "Vendor", "Price", "Total"]);

    for (product_id, quote) in best {
        let product = products
            .get(product_id)
            .ok_or(ReportError::MissingProduct(*product_id))?;
        let vendor = vendor_for(&vendors, quote)?;

        builder.push_record([
            product.name.clone(),
            product.category.clone().unwrap_or_default(),
            vendor.name.clone(),
            usd(quote.value),
            quote.total_cost().map(usd).unwrap_or_default(),
        ]);
    }

    write_table(&mut out, builder, 3..5)
}

/// Price history of one quote, newest first, with its trend.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_history(
    mut out: impl io::Write,
    quote: &Quote,
    history: &[HistoryEntry],
    trend: Trend,
) -> Result<(), ReportError> {
    writeln!(
        out,
        "Quote {} (current {}, trend: {trend})",
        quote.id,
        usd(quote.value)
    )?;

    let mut builder = Builder::default();

    builder.push_record(["When", "Change", "Old", "New"]);

    for entry in history {
        builder.push_record([
            entry.changed_at.strftime("%Y-%m-%d %H:%M:%S").to_string(),
            entry.change_type.to_string(),
            entry.old_value.map(usd).unwrap_or_default(),
            usd(entry.new_value),
        ]);
    }

    write_table(&mut out, builder, 2..4)
}

/// Every price change of a product's quotes, newest first.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_product_history(
    mut out: impl io::Write,
    product: &Product,
    history: &[HistoryEntry],
) -> Result<(), ReportError> {
    writeln!(out, "{} ({} change(s))", product.name, history.len())?;

    let mut builder = Builder::default();

    builder.push_record(["When", "Quote", "Change", "Old", "New"]);

    for entry in history {
        builder.push_record([
            entry.changed_at.strftime("%Y-%m-%d %H:%M:%S").to_string(),
            entry.quote.to_string(),
            entry.change_type.to_string(),
            entry.old_value.map(usd).unwrap_or_default(),
            usd(entry.new_value),
        ]);
    }

    write_table(&mut out, builder, 3..5)
}

/// Alert table.
///
/// Thresholds are compared against USD quote values, so they print in USD;
/// the currency the alert was entered in is shown alongside.
///
/// # Errors
///
/// Returns an error if an alert's product is not supplied or writing fails.
pub fn write_alerts(
    mut out: impl io::Write,
    alerts: &[PriceAlert],
    products: &[Product],
) -> Result<(), ReportError> {
    let products: FxHashMap<ProductId, &Product> =
        products.iter().map(|product| (product.id, product)).collect();

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Threshold", "Entered in", "Active", "Triggered"]);

    for alert in alerts {
        let product = products
            .get(&alert.product)
            .ok_or(ReportError::MissingProduct(alert.product))?;

        builder.push_record([
            alert.id.to_string(),
            product.name.clone(),
            usd(alert.threshold_value),
            alert.threshold_currency.to_string(),
            if alert.active { "yes" } else { "no" }.to_string(),
            alert
                .triggered_at
                .map(|at| at.strftime("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        ]);
    }

    write_table(&mut out, builder, 2..3)
}

/// Quotes on a purchase list with the list's total value.
///
/// # Errors
///
/// Returns an error if a product or vendor is not supplied or writing fails.
pub fn write_purchase_list(
    mut out: impl io::Write,
    list: &PurchaseList,
    quotes: &[Quote],
    products: &[Product],
    vendors: &[Vendor],
) -> Result<(), ReportError> {
    let products: FxHashMap<ProductId, &Product> =
        products.iter().map(|product| (product.id, product)).collect();
    let vendors = index_vendors(vendors);

    writeln!(out, "{}", list.name)?;

    if let Some(description) = &list.description {
        writeln!(out, "  {description}")?;
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Vendor", "Price", "Total"]);

    for quote in quotes {
        let product = products
            .get(&quote.product)
            .ok_or(ReportError::MissingProduct(quote.product))?;
        let vendor = vendor_for(&vendors, quote)?;

        builder.push_record([
            quote.id.to_string(),
            product.name.clone(),
            vendor.name.clone(),
            usd(quote.value),
            quote.total_cost().map(usd).unwrap_or_default(),
        ]);
    }

    write_table(&mut out, builder, 3..5)?;

    let total = total_value(quotes).map(usd).unwrap_or_default();

    writeln!(out, " {:>8}: {total}", "Total")?;
    writeln!(out, " {:>8}: {}", "Quotes", quotes.len())?;

    Ok(())
}

fn usd(amount: Decimal) -> String {
    format_amount(amount, CurrencyCode::USD)
}

fn index_vendors(vendors: &[Vendor]) -> FxHashMap<VendorId, &Vendor> {
    vendors.iter().map(|vendor| (vendor.id, vendor)).collect()
}

fn vendor_for<'v>(
    vendors: &FxHashMap<VendorId, &'v Vendor>,
    quote: &Quote,
) -> Result<&'v Vendor, ReportError> {
    vendors
        .get(&quote.vendor)
        .copied()
        .ok_or(ReportError::MissingVendor(quote.vendor))
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric: std::ops::Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Columns::new(numeric), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;

    Ok(())
}

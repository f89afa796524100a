//! Price aggregation across vendors.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::models::{Product, ProductId, Quote};

/// Cheapest quote of every product present in `quotes`.
///
/// Ranks on the stored USD `value`, not on total cost. When several quotes
/// share the minimum, the first one in `quotes` wins, so callers wanting a
/// different tie-break must order their input first. Products without quotes
/// are absent from the result.
pub fn best_price_per_product<'q, I>(
    quotes: I,
    products: Option<&BTreeSet<ProductId>>,
) -> BTreeMap<ProductId, &'q Quote>
where
    I: IntoIterator<Item = &'q Quote>,
{
    let mut best: BTreeMap<ProductId, &'q Quote> = BTreeMap::new();

    for quote in quotes {
        if products.is_some_and(|wanted| !wanted.contains(&quote.product)) {
            continue;
        }

        best.entry(quote.product)
            .and_modify(|current| {
                if quote.value < current.value {
                    *current = quote;
                }
            })
            .or_insert(quote);
    }

    best
}

/// Side-by-side view of every quote for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductComparison {
    pub product: Product,

    /// Cheapest first; equal values keep their input order.
    pub quotes: Vec<Quote>,
    pub best_price: Option<Decimal>,
    pub worst_price: Option<Decimal>,
    pub avg_price: Option<Decimal>,

    /// Worst minus best.
    pub savings: Option<Decimal>,
}

impl ProductComparison {
    /// The cheapest quote.
    pub fn best_quote(&self) -> Option<&Quote> {
        self.quotes.first()
    }

    /// Number of distinct vendors quoting this product.
    pub fn vendor_count(&self) -> usize {
        self.quotes
            .iter()
            .map(|quote| quote.vendor)
            .collect::<FxHashSet<_>>()
            .len()
    }

    /// Whether there is anything to compare.
    pub fn has_quotes(&self) -> bool {
        !self.quotes.is_empty()
    }
}

/// Summarise the quotes of `product`.
///
/// With no quotes every derived figure is `None`.
pub fn compare_product(product: Product, mut quotes: Vec<Quote>) -> ProductComparison {
    quotes.sort_by(|a, b| a.value.cmp(&b.value));

    let best_price = quotes.first().map(|quote| quote.value);
    let worst_price = quotes.last().map(|quote| quote.value);

    let avg_price = if quotes.is_empty() {
        None
    } else {
        quotes
            .iter()
            .try_fold(Decimal::ZERO, |total, quote| total.checked_add(quote.value))
            .and_then(|total| total.checked_div(Decimal::from(quotes.len())))
    };

    let savings = best_price
        .zip(worst_price)
        .and_then(|(best, worst)| worst.checked_sub(best));

    ProductComparison {
        product,
        quotes,
        best_price,
        worst_price,
        avg_price,
        savings,
    }
}

/// Drop comparisons without quotes and order the rest by best price.
pub fn rank_comparisons(comparisons: Vec<ProductComparison>) -> Vec<ProductComparison> {
    let mut ranked: Vec<ProductComparison> = comparisons
        .into_iter()
        .filter(ProductComparison::has_quotes)
        .collect();

    ranked.sort_by(|a, b| a.best_price.cmp(&b.best_price));

    ranked
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{BrandId, QuoteId, VendorId};

    fn product(id: u64, name: &str) -> Product {
        Product {
            id: ProductId::from_raw(id),
            name: name.to_string(),
            brand: BrandId::from_raw(1),
            category: None,
        }
    }

    fn quote(id: u64, vendor: u64, product: u64, value: Decimal) -> Quote {
        Quote {
            id: QuoteId::from_raw(id),
            vendor: VendorId::from_raw(vendor),
            product: ProductId::from_raw(product),
            value,
            original: None,
            discount: Decimal::ZERO,
            shipping_cost: None,
            tax_rate: None,
            status: None,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn best_price_picks_minimum_value() {
        let quotes = [
            quote(1, 10, 1, dec!(999)),
            quote(2, 11, 1, dec!(949)),
            quote(3, 12, 1, dec!(1049)),
        ];

        let best = best_price_per_product(&quotes, None);

        assert_eq!(
            best.get(&ProductId::from_raw(1)).map(|q| q.id),
            Some(QuoteId::from_raw(2))
        );
    }

    #[test]
    fn best_price_ties_go_to_first_seen() {
        let quotes = [
            quote(7, 10, 1, dec!(500)),
            quote(3, 11, 1, dec!(500.00)),
        ];

        let best = best_price_per_product(&quotes, None);

        assert_eq!(
            best.get(&ProductId::from_raw(1)).map(|q| q.id),
            Some(QuoteId::from_raw(7))
        );

        let reversed: Vec<Quote> = quotes.iter().rev().cloned().collect();
        let best = best_price_per_product(&reversed, None);

        assert_eq!(
            best.get(&ProductId::from_raw(1)).map(|q| q.id),
            Some(QuoteId::from_raw(3))
        );
    }

    #[test]
    fn best_price_respects_product_filter() {
        let quotes = [quote(1, 10, 1, dec!(10)), quote(2, 10, 2, dec!(20))];
        let wanted = BTreeSet::from([ProductId::from_raw(2), ProductId::from_raw(3)]);

        let best = best_price_per_product(&quotes, Some(&wanted));

        assert_eq!(best.keys().copied().collect::<Vec<_>>(), [ProductId::from_raw(2)]);
    }

    #[test]
    fn compare_product_summarises_quotes() {
        let comparison = compare_product(
            product(1, "MacBook Air"),
            vec![
                quote(1, 10, 1, dec!(999)),
                quote(2, 11, 1, dec!(949)),
                quote(3, 12, 1, dec!(1049)),
            ],
        );

        let values: Vec<Decimal> = comparison.quotes.iter().map(|q| q.value).collect();

        assert_eq!(values, [dec!(949), dec!(999), dec!(1049)]);
        assert_eq!(comparison.best_price, Some(dec!(949)));
        assert_eq!(comparison.worst_price, Some(dec!(1049)));
        assert_eq!(comparison.avg_price, Some(dec!(999)));
        assert_eq!(comparison.savings, Some(dec!(100)));
        assert_eq!(comparison.vendor_count(), 3);
    }

    #[test]
    fn average_that_overflows_is_left_out() {
        let comparison = compare_product(
            product(1, "Yacht"),
            vec![
                quote(1, 10, 1, Decimal::MAX),
                quote(2, 11, 1, Decimal::MAX),
            ],
        );

        assert_eq!(comparison.best_price, Some(Decimal::MAX));
        assert_eq!(comparison.avg_price, None);
        assert_eq!(comparison.savings, Some(Decimal::ZERO));
    }

    #[test]
    fn compare_product_without_quotes_is_empty() {
        let comparison = compare_product(product(1, "Orphan"), Vec::new());

        assert!(comparison.quotes.is_empty());
        assert_eq!(comparison.best_price, None);
        assert_eq!(comparison.worst_price, None);
        assert_eq!(comparison.avg_price, None);
        assert_eq!(comparison.savings, None);
        assert_eq!(comparison.best_quote(), None);
    }

    #[test]
    fn ranking_drops_empty_and_sorts_by_best_price() {
        let ranked = rank_comparisons(vec![
            compare_product(product(1, "Pricey"), vec![quote(1, 10, 1, dec!(300))]),
            compare_product(product(2, "Empty"), Vec::new()),
            compare_product(product(3, "Cheap"), vec![quote(2, 10, 3, dec!(100))]),
        ]);

        let names: Vec<&str> = ranked.iter().map(|c| c.product.name.as_str()).collect();

        assert_eq!(names, ["Cheap", "Pricey"]);
    }
}

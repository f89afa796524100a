//! Price alerts

use jiff::Timestamp;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    currency::CurrencyCode,
    errors::ValidationError,
    ids::TypedId,
    models::ProductId,
    store::{RepositoryMut, StoreError},
};

/// Alert id.
pub type AlertId = TypedId<PriceAlert>;

/// A standing watch for a product's price to fall to a threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAlert {
    pub id: AlertId,
    pub product: ProductId,

    /// Compared against quote values, which are always USD.
    pub threshold_value: Decimal,

    /// Currency the threshold was entered in; informational only.
    pub threshold_currency: CurrencyCode,
    pub active: bool,
    pub created_at: Timestamp,

    /// Set once, when the alert fires.
    pub triggered_at: Option<Timestamp>,
}

impl PriceAlert {
    /// Whether this alert can still fire.
    pub fn is_armed(&self) -> bool {
        self.active && self.triggered_at.is_none()
    }

    /// Whether `price` meets the threshold (inclusive).
    pub fn is_met_by(&self, price: Decimal) -> bool {
        price <= self.threshold_value
    }
}

/// Reject thresholds that could never be meaningful.
///
/// # Errors
///
/// Returns [`ValidationError::NonPositiveThreshold`] for zero or negative values.
pub fn validate_threshold(threshold: Decimal) -> Result<(), ValidationError> {
    if threshold <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveThreshold(threshold));
    }

    Ok(())
}

/// Fire every armed alert on `product` that `current_price` satisfies.
///
/// Fired alerts get `triggered_at = now` and are returned; alerts that already
/// fired, or were deactivated, are left alone. Run this inside the same
/// transaction as the price write so that either every qualifying alert is
/// marked or none is.
///
/// # Errors
///
/// Returns an error if the store fails to read or update an alert.
pub fn check_alerts<R: RepositoryMut + ?Sized>(
    repo: &mut R,
    product: ProductId,
    current_price: Decimal,
    now: Timestamp,
) -> Result<Vec<PriceAlert>, StoreError> {
    let mut triggered = Vec::new();

    for mut alert in repo.alerts_for_product(product)? {
        if !alert.is_armed() || !alert.is_met_by(current_price) {
            continue;
        }

        alert.triggered_at = Some(now);
        repo.update_alert(&alert)?;

        info!(
            alert_id = %alert.id,
            product_id = %product,
            threshold = %alert.threshold_value,
            price = %current_price,
            "price alert triggered"
        );

        triggered.push(alert);
    }

    Ok(triggered)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;
    use crate::store::{
        MemoryStore, MemoryTransaction, NewAlertRecord, NewProductRecord, Repository, Store,
    };

    fn watched_product(tx: &mut MemoryTransaction<'_>) -> Result<ProductId, StoreError> {
        let brand = tx.insert_brand("Apple")?;
        let product = tx.insert_product(NewProductRecord {
            name: "MacBook Air".to_string(),
            brand: brand.id,
            category: Some("laptop".to_string()),
        })?;

        Ok(product.id)
    }

    fn alert_at(
        tx: &mut MemoryTransaction<'_>,
        product: ProductId,
        threshold_value: Decimal,
    ) -> Result<PriceAlert, StoreError> {
        tx.insert_alert(NewAlertRecord {
            product,
            threshold_value,
            threshold_currency: CurrencyCode::USD,
            created_at: Timestamp::UNIX_EPOCH,
        })
    }

    #[test]
    fn fires_once_and_only_at_or_below_threshold() -> TestResult {
        let mut store = MemoryStore::new();
        let mut tx = store.begin()?;

        let product = watched_product(&mut tx)?;
        let alert = alert_at(&mut tx, product, dec!(900))?;
        let now: Timestamp = "2025-02-01T08:30:00Z".parse()?;

        assert!(check_alerts(&mut tx, product, dec!(950), now)?.is_empty());

        let fired = check_alerts(&mut tx, product, dec!(900), now)?;

        assert_eq!(fired.len(), 1);
        assert_eq!(fired.first().map(|a| a.id), Some(alert.id));
        assert_eq!(tx.alert(alert.id)?.and_then(|a| a.triggered_at), Some(now));

        assert!(
            check_alerts(&mut tx, product, dec!(800), now)?.is_empty(),
            "a triggered alert never fires again"
        );

        Ok(())
    }

    #[test]
    fn inactive_alerts_are_skipped() -> TestResult {
        let mut store = MemoryStore::new();
        let mut tx = store.begin()?;

        let product = watched_product(&mut tx)?;
        let mut alert = alert_at(&mut tx, product, dec!(900))?;
        alert.active = false;
        tx.update_alert(&alert)?;

        assert!(check_alerts(&mut tx, product, dec!(1), Timestamp::UNIX_EPOCH)?.is_empty());

        Ok(())
    }

    #[test]
    fn fires_every_qualifying_alert() -> TestResult {
        let mut store = MemoryStore::new();
        let mut tx = store.begin()?;

        let product = watched_product(&mut tx)?;
        alert_at(&mut tx, product, dec!(900))?;
        alert_at(&mut tx, product, dec!(1000))?;
        alert_at(&mut tx, product, dec!(500))?;

        let fired = check_alerts(&mut tx, product, dec!(899), Timestamp::UNIX_EPOCH)?;

        let thresholds: Vec<Decimal> = fired.iter().map(|a| a.threshold_value).collect();

        assert_eq!(thresholds, [dec!(900), dec!(1000)]);

        Ok(())
    }

    #[test]
    fn thresholds_must_be_positive() {
        assert_eq!(
            validate_threshold(Decimal::ZERO),
            Err(ValidationError::NonPositiveThreshold(Decimal::ZERO))
        );
        assert_eq!(validate_threshold(dec!(0.01)), Ok(()));
    }
}

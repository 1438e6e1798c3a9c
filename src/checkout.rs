//! Checkout
//!
//! Turns a priced cart into a persisted sale record. The manual discount is
//! applied here, after pricing, and never feeds back into promotions.

use clap::ValueEnum;
use decimal_percentage::Percentage;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{cart::CartLine, pricing::PricedCart};

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to sell.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Discounts cannot add to the amount due.
    #[error("manual discount cannot be negative: {0}")]
    NegativeDiscount(Decimal),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Sale record could not be (de)serialized.
    #[error("Failed to (de)serialize sale record: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// A discount entered by the cashier at checkout.
#[derive(Debug, Clone, Copy)]
pub enum ManualDiscount<'a> {
    /// Flat amount off the total
    Amount(Money<'a, Currency>),

    /// Percentage off the total
    Percent(Percentage),
}

/// Kind of manual discount recorded on a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// No manual discount
    None,

    /// Flat amount
    Amount,

    /// Percentage
    Percent,
}

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash
    #[default]
    Cash,

    /// Debit or credit card
    Card,

    /// Bank transfer
    Transfer,

    /// E-wallet or QR payment
    EWallet,
}

/// Sale status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Paid in full
    #[default]
    Completed,

    /// Awaiting payment
    Pending,

    /// Voided
    Cancelled,
}

/// Cashier input for a checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutRequest<'a> {
    /// Manual discount applied after promotions
    pub discount: Option<ManualDiscount<'a>>,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Sale status to record
    pub status: SaleStatus,

    /// Optional customer name
    pub customer_name: Option<String>,
}

/// A priced line as stored on a sale. Amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Product id
    pub id: String,

    /// Product SKU
    pub code: String,

    /// Product name
    pub name: String,

    /// Units sold
    pub quantity: u32,

    /// Unit price charged
    pub price: i64,

    /// Unit price before a promotion overrode it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<i64>,

    /// Bonus line
    #[serde(default)]
    pub is_free: bool,

    /// Promotion label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_applied: Option<String>,
}

impl From<&CartLine<'_>> for SaleLine {
    fn from(line: &CartLine<'_>) -> Self {
        Self {
            id: line.product.id.clone(),
            code: line.product.code.clone(),
            name: line.product.name.clone(),
            quantity: line.quantity,
            price: line.price().to_minor_units(),
            original_price: line.original_price.map(|price| price.to_minor_units()),
            is_free: line.is_free,
            promotion_applied: line.promotion_applied.clone(),
        }
    }
}

/// A completed sale. Amounts are in minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    /// Sale id
    pub id: Uuid,

    /// Priced line snapshot
    pub items: Vec<SaleLine>,

    /// Amount due after the manual discount
    pub total: i64,

    /// Promotion-priced total before the manual discount
    pub subtotal: i64,

    /// Discount as entered: minor units for amounts, percent points for percentages
    pub discount_value: Decimal,

    /// Discount kind
    pub discount_type: DiscountType,

    /// UTC calendar date of the sale
    pub date: Date,

    /// Instant of the sale
    pub timestamp: Timestamp,

    /// Payment method
    pub payment_method: PaymentMethod,

    /// Status
    pub status: SaleStatus,

    /// Customer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// ISO currency code
    pub currency: String,
}

impl SaleRecord {
    /// Serialize the record as YAML.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError::Yaml` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, CheckoutError> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Parse a record from YAML.
    ///
    /// # Errors
    ///
    /// Returns a `CheckoutError::Yaml` if the document is not a valid sale record.
    pub fn from_yaml(yaml: &str) -> Result<Self, CheckoutError> {
        Ok(serde_norway::from_str(yaml)?)
    }
}

/// Build a sale record from a priced cart.
///
/// # Errors
///
/// Returns a `CheckoutError` if the cart is empty, the discount is negative or
/// in another currency, or a percentage cannot be represented in minor units.
pub fn checkout(
    priced: &PricedCart<'_>,
    request: CheckoutRequest<'_>,
    now: Timestamp,
) -> Result<SaleRecord, CheckoutError> {
    if priced.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let subtotal = priced.total();

    let (discount_minor, discount_value, discount_type) = match request.discount {
        None => (0, Decimal::ZERO, DiscountType::None),
        Some(ManualDiscount::Amount(amount)) => {
            if amount.currency() != subtotal.currency() {
                return Err(MoneyError::CurrencyMismatch {
                    expected: subtotal.currency().iso_alpha_code,
                    actual: amount.currency().iso_alpha_code,
                }
                .into());
            }

            let minor = amount.to_minor_units();

            if minor < 0 {
                return Err(CheckoutError::NegativeDiscount(Decimal::from(minor)));
            }

            (minor, Decimal::from(minor), DiscountType::Amount)
        }
        Some(ManualDiscount::Percent(percent)) => {
            let points = (percent * Decimal::ONE_HUNDRED).normalize();

            if points < Decimal::ZERO {
                return Err(CheckoutError::NegativeDiscount(points));
            }

            (
                percent_of_minor(&percent, subtotal.to_minor_units())?,
                points,
                DiscountType::Percent,
            )
        }
    };

    let total = subtotal.to_minor_units().saturating_sub(discount_minor).max(0);

    Ok(SaleRecord {
        id: Uuid::now_v7(),
        items: priced.items().iter().map(SaleLine::from).collect(),
        total,
        subtotal: subtotal.to_minor_units(),
        discount_value,
        discount_type,
        date: now.to_zoned(TimeZone::UTC).date(),
        timestamp: now,
        payment_method: request.payment_method,
        status: request.status,
        customer_name: request.customer_name,
        currency: priced.currency().iso_alpha_code.to_string(),
    })
}

/// Calculate `percent` of a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns `CheckoutError::PercentConversion` if the result overflows `i64`.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, CheckoutError> {
    let minor = Decimal::from(minor);

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(CheckoutError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(CheckoutError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{IDR, USD};
    use testresult::TestResult;

    use crate::{
        cart::Cart,
        pricing::price,
        products::{Catalog, Product},
    };

    use super::*;

    fn idr<'a>(minor: i64) -> Money<'a, Currency> {
        Money::from_minor(minor, IDR)
    }

    fn priced<'a>() -> TestResult<PricedCart<'a>> {
        let product = Product::new("p-1", "KOPI", "Kopi", idr(25_000));
        let catalog = Catalog::with_products([product.clone()], IDR)?;
        let mut cart = Cart::new(IDR);

        cart.add(&product, 2)?;

        Ok(price(&cart, &[], &catalog))
    }

    fn now() -> TestResult<Timestamp> {
        Ok("2024-03-09T23:30:00Z".parse()?)
    }

    #[test]
    fn no_discount_keeps_engine_total() -> TestResult {
        let sale = checkout(&priced()?, CheckoutRequest::default(), now()?)?;

        assert_eq!(sale.subtotal, 50_000);
        assert_eq!(sale.total, 50_000);
        assert_eq!(sale.discount_type, DiscountType::None);
        assert_eq!(sale.currency, "IDR");
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.date, jiff::civil::date(2024, 3, 9));

        Ok(())
    }

    #[test]
    fn amount_discount_is_subtracted() -> TestResult {
        let request = CheckoutRequest {
            discount: Some(ManualDiscount::Amount(idr(5_000))),
            payment_method: PaymentMethod::Card,
            customer_name: Some("Budi".to_string()),
            ..CheckoutRequest::default()
        };

        let sale = checkout(&priced()?, request, now()?)?;

        assert_eq!(sale.subtotal, 50_000);
        assert_eq!(sale.total, 45_000);
        assert_eq!(sale.discount_value, Decimal::from(5_000));
        assert_eq!(sale.discount_type, DiscountType::Amount);
        assert_eq!(sale.payment_method, PaymentMethod::Card);
        assert_eq!(sale.customer_name.as_deref(), Some("Budi"));

        Ok(())
    }

    #[test]
    fn percent_discount_rounds_half_away_from_zero() -> TestResult {
        let request = CheckoutRequest {
            discount: Some(ManualDiscount::Percent(Percentage::from(0.125))),
            ..CheckoutRequest::default()
        };

        let sale = checkout(&priced()?, request, now()?)?;

        assert_eq!(sale.total, 43_750);
        assert_eq!(sale.discount_value, Decimal::new(125, 1));
        assert_eq!(sale.discount_type, DiscountType::Percent);

        Ok(())
    }

    #[test]
    fn oversized_discount_clamps_to_zero() -> TestResult {
        let request = CheckoutRequest {
            discount: Some(ManualDiscount::Amount(idr(80_000))),
            ..CheckoutRequest::default()
        };

        let sale = checkout(&priced()?, request, now()?)?;

        assert_eq!(sale.total, 0);

        Ok(())
    }

    #[test]
    fn negative_discounts_are_rejected() -> TestResult {
        let amount = CheckoutRequest {
            discount: Some(ManualDiscount::Amount(idr(-5_000))),
            ..CheckoutRequest::default()
        };

        assert!(matches!(
            checkout(&priced()?, amount, now()?),
            Err(CheckoutError::NegativeDiscount(value)) if value == Decimal::from(-5_000)
        ));

        let percent = CheckoutRequest {
            discount: Some(ManualDiscount::Percent(Percentage::from(-0.1))),
            ..CheckoutRequest::default()
        };

        assert!(matches!(
            checkout(&priced()?, percent, now()?),
            Err(CheckoutError::NegativeDiscount(_))
        ));

        Ok(())
    }

    #[test]
    fn foreign_discount_currency_errors() -> TestResult {
        let request = CheckoutRequest {
            discount: Some(ManualDiscount::Amount(Money::from_minor(100, USD))),
            ..CheckoutRequest::default()
        };

        let result = checkout(&priced()?, request, now()?);

        assert!(matches!(
            result,
            Err(CheckoutError::Money(MoneyError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }

    #[test]
    fn empty_cart_is_rejected() -> TestResult {
        let catalog = Catalog::new(IDR);
        let empty = price(&Cart::new(IDR), &[], &catalog);

        let result = checkout(&empty, CheckoutRequest::default(), now()?);

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn sale_record_survives_yaml() -> TestResult {
        let request = CheckoutRequest {
            discount: Some(ManualDiscount::Percent(Percentage::from(0.1))),
            payment_method: PaymentMethod::EWallet,
            status: SaleStatus::Pending,
            customer_name: None,
        };

        let sale = checkout(&priced()?, request, now()?)?;
        let parsed = SaleRecord::from_yaml(&sale.to_yaml()?)?;

        assert_eq!(parsed, sale);

        Ok(())
    }

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        assert_eq!(percent_of_minor(&Percentage::from(0.25), 200)?, 50);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(&Percentage::from(2.0), i64::MAX);

        assert!(matches!(result, Err(CheckoutError::PercentConversion)));
    }
}

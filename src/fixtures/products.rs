//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, IDR, SGD, USD},
};
use serde::Deserialize;

use crate::{checkout::ManualDiscount, fixtures::FixtureError, products::Product};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Products in catalog order
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product id
    pub id: String,

    /// Product SKU
    pub code: String,

    /// Product name
    pub name: String,

    /// Sale price (e.g., "3500 IDR")
    pub price: String,

    /// Unit cost; zero when omitted
    #[serde(default)]
    pub cost: Option<String>,

    /// Category
    #[serde(default)]
    pub category: String,

    /// Quantity on hand; unlimited when omitted
    #[serde(default)]
    pub stock: Option<i64>,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let price = parse_money(&fixture.price)?;

        let mut product = Product::new(fixture.id, fixture.code, fixture.name, price)
            .with_category(fixture.category);

        if let Some(cost) = fixture.cost.as_deref() {
            product = product.with_cost(parse_money(cost)?);
        }

        if let Some(stock) = fixture.stock {
            product = product.with_stock(stock);
        }

        product.image = fixture.image;

        Ok(product)
    }
}

/// Parse a price string into `Money`.
///
/// # Errors
///
/// Returns an error if the string is not a valid price (see [`parse_price`]).
pub fn parse_money(s: &str) -> Result<Money<'static, Currency>, FixtureError> {
    let (minor_units, currency) = parse_price(s)?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        "IDR" => IDR,
        "SGD" => SGD,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    let minor_units = amount
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / 100.0))
    } else {
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}

/// Parse a manual discount: a percentage ("10%") or an amount ("5000 IDR")
///
/// # Errors
///
/// Returns an error if the string is neither a valid percentage nor a valid price.
pub fn parse_discount(s: &str) -> Result<ManualDiscount<'static>, FixtureError> {
    if s.trim().ends_with('%') {
        return Ok(ManualDiscount::Percent(parse_percentage(s)?));
    }

    Ok(ManualDiscount::Amount(parse_money(s)?))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_uses_currency_exponent() -> TestResult {
        let (usd_minor, usd) = parse_price("1.25 USD")?;
        let (idr_minor, idr) = parse_price("3500 IDR")?;

        assert_eq!(usd_minor, 125);
        assert_eq!(usd, USD);
        assert_eq!(idr_minor, 3500 * 10_i64.pow(IDR.exponent));
        assert_eq!(idr, IDR);

        Ok(())
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> TestResult {
        assert_eq!(parse_percentage("15%")?, Percentage::from(0.15));
        assert_eq!(parse_percentage("  0.15 ")?, Percentage::from(0.15));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_invalid_format() {
        let result = parse_percentage("lots");

        assert!(matches!(result, Err(FixtureError::InvalidPercentage(_))));
    }

    #[test]
    fn parse_discount_distinguishes_percent_and_amount() -> TestResult {
        assert!(matches!(
            parse_discount("10%")?,
            ManualDiscount::Percent(percent) if percent == Percentage::from(0.1)
        ));
        assert!(matches!(
            parse_discount("5000 IDR")?,
            ManualDiscount::Amount(amount) if amount.currency() == IDR
        ));
        assert!(parse_discount("ten").is_err());

        Ok(())
    }

    #[test]
    fn product_fixture_defaults() -> TestResult {
        let yaml = r#"
id: p-1
code: MIE-01
name: Mie Instan
price: "3500 IDR"
"#;
        let fixture: ProductFixture = serde_norway::from_str(yaml)?;
        let product = Product::try_from(fixture)?;

        assert_eq!(product.cost.to_minor_units(), 0);
        assert_eq!(product.stock, i64::MAX);
        assert!(product.category.is_empty());
        assert!(product.image.is_none());

        Ok(())
    }

    #[test]
    fn product_fixture_reads_all_fields() -> TestResult {
        let yaml = r#"
id: p-2
code: SBN-01
name: Sabun
price: "15000 IDR"
cost: "11000 IDR"
category: household
stock: 40
image: img/sabun.png
"#;
        let fixture: ProductFixture = serde_norway::from_str(yaml)?;
        let product = Product::try_from(fixture)?;

        assert_eq!(product.price, parse_money("15000 IDR")?);
        assert_eq!(product.cost, parse_money("11000 IDR")?);
        assert_eq!(product.category, "household");
        assert_eq!(product.stock, 40);
        assert_eq!(product.image.as_deref(), Some("img/sabun.png"));

        Ok(())
    }
}

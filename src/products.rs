//! Products

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// Two products share the same id.
    #[error("Duplicate product id: {0}")]
    DuplicateId(String),

    /// A product's price currency differs from the catalog currency (id, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id, unique within a catalog
    pub id: String,

    /// Product SKU
    pub code: String,

    /// Display name
    pub name: String,

    /// Sale unit price
    pub price: Money<'a, Currency>,

    /// Unit cost, used for margin reporting only
    pub cost: Money<'a, Currency>,

    /// Category name
    pub category: String,

    /// Quantity on hand
    pub stock: i64,

    /// Optional image reference
    pub image: Option<String>,
}

impl<'a> Product<'a> {
    /// Create a product with zero cost, no category, no stock limit and no image.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            cost: Money::from_minor(0, price.currency()),
            price,
            category: String::new(),
            stock: i64::MAX,
            image: None,
        }
    }

    /// Set the quantity on hand.
    #[must_use]
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the unit cost.
    #[must_use]
    pub fn with_cost(mut self, cost: Money<'a, Currency>) -> Self {
        self.cost = cost;
        self
    }

    /// Whether `code` refers to this product's SKU, ignoring case.
    pub fn has_code(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.to_lowercase()
    }
}

/// A read-only snapshot of the products on sale.
///
/// Ids are unique and every price shares the catalog currency. Codes are
/// indexed case-insensitively; when two products share a code the first one
/// wins lookups.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    products: Vec<Product<'a>>,
    by_code: FxHashMap<String, usize>,
    by_id: FxHashMap<String, usize>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            products: Vec::new(),
            by_code: FxHashMap::default(),
            by_id: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from the given products.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` on duplicate ids or mismatched currencies.
    pub fn with_products(
        products: impl IntoIterator<Item = Product<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Append a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the id is taken or the currency differs.
    pub fn insert(&mut self, product: Product<'a>) -> Result<(), CatalogError> {
        let product_currency = product.price.currency();

        if product_currency != self.currency {
            return Err(CatalogError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        if self.by_id.contains_key(&product.id) {
            return Err(CatalogError::DuplicateId(product.id));
        }

        let idx = self.products.len();

        self.by_id.insert(product.id.clone(), idx);
        self.by_code.entry(product.code.to_lowercase()).or_insert(idx);
        self.products.push(product);

        Ok(())
    }

    /// Find a product by SKU, ignoring case.
    pub fn find_by_code(&self, code: &str) -> Option<&Product<'a>> {
        let idx = self.by_code.get(&code.to_lowercase())?;

        self.products.get(*idx)
    }

    /// Find a product by id.
    pub fn get(&self, id: &str) -> Option<&Product<'a>> {
        let idx = self.by_id.get(id)?;

        self.products.get(*idx)
    }

    /// Iterate over the products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Catalog currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{IDR, USD};
    use testresult::TestResult;

    use super::*;

    fn coffee<'a>() -> Product<'a> {
        Product::new("p-1", "KOPI-01", "Kopi Susu", Money::from_minor(25_000, IDR))
    }

    #[test]
    fn find_by_code_ignores_case() -> TestResult {
        let catalog = Catalog::with_products([coffee()], IDR)?;

        assert_eq!(
            catalog.find_by_code("kopi-01").map(|p| p.id.as_str()),
            Some("p-1")
        );
        assert!(catalog.find_by_code("KOPI-02").is_none());

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = Catalog::with_products([coffee(), coffee()], IDR);

        assert_eq!(result.err(), Some(CatalogError::DuplicateId("p-1".to_string())));
    }

    #[test]
    fn currency_mismatch_is_rejected() {
        let product = Product::new("p-2", "TEA", "Tea", Money::from_minor(100, USD));

        let result = Catalog::with_products([product], IDR);

        assert!(matches!(
            result,
            Err(CatalogError::CurrencyMismatch(id, "USD", "IDR")) if id == "p-2"
        ));
    }

    #[test]
    fn first_product_wins_shared_code() -> TestResult {
        let mut second = coffee();
        second.id = "p-9".to_string();
        second.code = "kopi-01".to_string();

        let catalog = Catalog::with_products([coffee(), second], IDR)?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find_by_code("KOPI-01").map(|p| p.id.as_str()),
            Some("p-1")
        );
        assert_eq!(catalog.get("p-9").map(|p| p.code.as_str()), Some("kopi-01"));

        Ok(())
    }

    #[test]
    fn builder_methods_set_fields() {
        let product = coffee()
            .with_stock(12)
            .with_category("drinks")
            .with_cost(Money::from_minor(9_000, IDR));

        assert_eq!(product.stock, 12);
        assert_eq!(product.category, "drinks");
        assert_eq!(product.cost, Money::from_minor(9_000, IDR));
        assert!(product.has_code("Kopi-01"));
    }
}

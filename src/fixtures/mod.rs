//! Fixtures
//!
//! YAML configuration for catalogs, promotions and carts. A fixture set named
//! `grocery` lives in `products/grocery.yml`, `promotions/grocery.yml` and
//! `carts/grocery.yml` under the base path.

use std::{fs, path::PathBuf};

use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    fixtures::{carts::CartFixture, products::ProductsFixture, promotions::PromotionsFixture},
    products::{Catalog, CatalogError, Product},
    promotions::Promotion,
    register::Register,
};

pub mod carts;
pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoProducts,

    /// No cart loaded
    #[error("No cart loaded")]
    NoCart,

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart construction error
    #[error("Failed to build cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Option<Catalog<'a>>,
    promotions: Vec<Promotion<'a>>,
    cart: Option<Cart<'a>>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            promotions: Vec::new(),
            cart: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// The first product's price sets the catalog currency.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the catalog rejects a product.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        for product_fixture in fixture.products {
            // Parse to get currency first (before creating Product)
            let (_minor_units, currency) = products::parse_price(&product_fixture.price)?;

            let product: Product<'a> = product_fixture.try_into()?;

            self.catalog
                .get_or_insert_with(|| Catalog::new(currency))
                .insert(product)?;
        }

        Ok(self)
    }

    /// Load promotions from a YAML fixture file, appending them in file order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a price is invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for promotion_fixture in fixture.promotions {
            self.promotions.push(promotion_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Load a cart from a YAML fixture file, replacing any loaded cart
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, no products are
    /// loaded, a referenced product is missing, or the cart rejects a line.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CartFixture = serde_norway::from_str(&contents)?;

        let catalog = self.catalog.as_ref().ok_or(FixtureError::NoProducts)?;
        let mut cart = Cart::new(catalog.currency());

        for line in fixture.lines {
            let product = catalog
                .get(&line.product)
                .ok_or_else(|| FixtureError::ProductNotFound(line.product.clone()))?;

            cart.add(product, line.quantity)?;
        }

        self.cart = Some(cart);

        Ok(self)
    }

    /// Load a complete fixture set (products, promotions and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from `base_path`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_promotions(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// The loaded catalog
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::NoProducts` if no products have been loaded.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoProducts)
    }

    /// The loaded promotions
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    /// The loaded cart
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::NoCart` if no cart has been loaded.
    pub fn cart(&self) -> Result<&Cart<'a>, FixtureError> {
        self.cart.as_ref().ok_or(FixtureError::NoCart)
    }

    /// Build a register holding the loaded catalog and promotions, with an empty cart
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::NoProducts` if no products have been loaded.
    pub fn into_register(self) -> Result<Register<'a>, FixtureError> {
        let catalog = self.catalog.ok_or(FixtureError::NoProducts)?;

        Ok(Register::new(catalog, self.promotions))
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

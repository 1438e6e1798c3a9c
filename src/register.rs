//! Register
//!
//! Holds the state the pricing engine is fed from (catalog, promotions, cart)
//! and re-prices after every change to any of them.

use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartError},
    checkout::{CheckoutError, CheckoutRequest, SaleRecord, checkout},
    pricing::{PricedCart, price},
    products::Catalog,
    promotions::Promotion,
};

/// Errors raised by register operations.
#[derive(Debug, Error)]
pub enum RegisterError {
    /// No product with this id in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Catalog and cart use different currencies (catalog currency, cart currency).
    #[error("Catalog has currency {0}, but cart has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Cart mutation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Checkout failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// A point-of-sale register.
#[derive(Debug)]
pub struct Register<'a> {
    catalog: Catalog<'a>,
    promotions: Vec<Promotion<'a>>,
    cart: Cart<'a>,
    priced: PricedCart<'a>,
}

impl<'a> Register<'a> {
    /// Create a register with an empty cart in the catalog currency.
    pub fn new(catalog: Catalog<'a>, promotions: Vec<Promotion<'a>>) -> Self {
        let cart = Cart::new(catalog.currency());
        let priced = price(&cart, &promotions, &catalog);

        Self {
            catalog,
            promotions,
            cart,
            priced,
        }
    }

    /// Add `quantity` units of the catalog product `id`.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError` if the product is unknown or the cart rejects the change.
    pub fn add(&mut self, id: &str, quantity: u32) -> Result<&PricedCart<'a>, RegisterError> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| RegisterError::ProductNotFound(id.to_string()))?;

        self.cart.add(product, quantity)?;

        Ok(self.reprice())
    }

    /// Set the quantity of product `id`; zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError` if the cart rejects the change.
    pub fn set_quantity(
        &mut self,
        id: &str,
        quantity: u32,
    ) -> Result<&PricedCart<'a>, RegisterError> {
        self.cart.set_quantity(id, quantity)?;

        Ok(self.reprice())
    }

    /// Remove product `id` from the cart.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError` if there is no such line.
    pub fn remove(&mut self, id: &str) -> Result<&PricedCart<'a>, RegisterError> {
        self.cart.remove(id)?;

        Ok(self.reprice())
    }

    /// Replace the promotion list.
    pub fn set_promotions(&mut self, promotions: Vec<Promotion<'a>>) -> &PricedCart<'a> {
        self.promotions = promotions;
        self.reprice()
    }

    /// Replace the catalog. Cart lines keep the product snapshot they were added with.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError::CurrencyMismatch` if the catalog currency differs from the cart's.
    pub fn set_catalog(&mut self, catalog: Catalog<'a>) -> Result<&PricedCart<'a>, RegisterError> {
        if catalog.currency() != self.cart.currency() {
            return Err(RegisterError::CurrencyMismatch(
                catalog.currency().iso_alpha_code,
                self.cart.currency().iso_alpha_code,
            ));
        }

        self.catalog = catalog;

        Ok(self.reprice())
    }

    /// Record the sale and start a new cart.
    ///
    /// # Errors
    ///
    /// Returns a `RegisterError::Checkout` if the checkout fails; the cart is kept.
    pub fn checkout(
        &mut self,
        request: CheckoutRequest<'_>,
        now: Timestamp,
    ) -> Result<SaleRecord, RegisterError> {
        let sale = checkout(&self.priced, request, now)?;

        info!(
            sale = %sale.id,
            total = sale.total,
            currency = %sale.currency,
            items = sale.items.len(),
            "sale recorded"
        );

        self.cart.clear();
        self.reprice();

        Ok(sale)
    }

    /// The current priced cart.
    pub fn priced(&self) -> &PricedCart<'a> {
        &self.priced
    }

    /// The current cart.
    pub fn cart(&self) -> &Cart<'a> {
        &self.cart
    }

    /// The current catalog.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// The current promotions.
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    fn reprice(&mut self) -> &PricedCart<'a> {
        self.priced = price(&self.cart, &self.promotions, &self.catalog);

        &self.priced
    }
}

//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::Product;

/// Errors related to cart mutations.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (product id, line currency, cart currency).
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(String, &'static str, &'static str),

    /// A quantity of zero was requested for a new line.
    #[error("Quantity must be at least 1 for product {0}")]
    ZeroQuantity(String),

    /// The requested quantity is more than the product has in stock.
    #[error("Product {id} has {available} in stock, {requested} requested")]
    InsufficientStock {
        /// Product id
        id: String,
        /// Quantity on hand
        available: i64,
        /// Quantity the line would hold
        requested: u32,
    },

    /// No paid line exists for the product.
    #[error("No line for product {0}")]
    LineNotFound(String),
}

/// A product placed in a cart with a quantity and pricing annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    /// Product snapshot; `product.price` is the unit price currently charged
    pub product: Product<'a>,

    /// Units on this line, at least 1
    pub quantity: u32,

    /// Bonus line synthesized by a buy-X-get-Y promotion
    pub is_free: bool,

    /// Unit price before a promotion overrode it
    pub original_price: Option<Money<'a, Currency>>,

    /// Label of the promotion in effect on this line
    pub promotion_applied: Option<String>,
}

impl<'a> CartLine<'a> {
    /// Create an unannotated paid line.
    pub fn new(product: Product<'a>, quantity: u32) -> Self {
        Self {
            product,
            quantity,
            is_free: false,
            original_price: None,
            promotion_applied: None,
        }
    }

    /// Create a bonus line for `product`, charged at zero.
    pub fn free(mut product: Product<'a>, quantity: u32, promotion: impl Into<String>) -> Self {
        product.price = Money::from_minor(0, product.price.currency());

        Self {
            product,
            quantity,
            is_free: true,
            original_price: None,
            promotion_applied: Some(promotion.into()),
        }
    }

    /// Unit price currently charged.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.product.price
    }

    /// Unit price before any promotion.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        self.original_price.as_ref().unwrap_or(&self.product.price)
    }

    /// `price * quantity` in minor units.
    pub fn line_total_minor(&self) -> i64 {
        self.product
            .price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }

    /// `base_price * quantity` in minor units; zero for free lines.
    pub fn base_total_minor(&self) -> i64 {
        if self.is_free {
            return 0;
        }

        self.base_price()
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// An ordered list of cart lines sharing one currency.
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
}

impl<'a> Cart<'a> {
    /// Create an empty cart.
    #[must_use]
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if any line has a zero quantity or is priced in
    /// another currency, or a paid line exceeds its product's stock.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines.iter().try_for_each(|line| {
            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity(line.product.id.clone()));
            }

            check_currency(&line.product, currency)?;

            if line.is_free {
                return Ok(());
            }

            check_stock(&line.product, line.quantity)
        })?;

        Ok(Cart { lines, currency })
    }

    /// Create a cart from lines already known to share `currency`.
    pub(crate) fn from_lines_unchecked(
        lines: Vec<CartLine<'a>>,
        currency: &'static Currency,
    ) -> Self {
        Cart { lines, currency }
    }

    /// Add `quantity` units of `product`, merging into an existing paid line with the same id.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if the quantity is zero, the currency differs, or
    /// the resulting quantity exceeds the product's stock.
    pub fn add(&mut self, product: &Product<'a>, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product.id.clone()));
        }

        check_currency(product, self.currency)?;

        if let Some(line) = self.paid_line_mut(&product.id) {
            let requested = line.quantity.saturating_add(quantity);

            check_stock(product, requested)?;
            line.quantity = requested;

            return Ok(());
        }

        check_stock(product, quantity)?;
        self.lines.push(CartLine::new(product.clone(), quantity));

        Ok(())
    }

    /// Set the quantity of the paid line for product `id`. A quantity of zero removes it.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if there is no such line or the quantity exceeds stock.
    pub fn set_quantity(&mut self, id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove(id);
        }

        let line = self
            .paid_line_mut(id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;

        check_stock(&line.product, quantity)?;
        line.quantity = quantity;

        Ok(())
    }

    /// Remove the paid line for product `id`.
    ///
    /// # Errors
    ///
    /// Returns a `CartError::LineNotFound` if there is no such line.
    pub fn remove(&mut self, id: &str) -> Result<(), CartError> {
        let idx = self
            .lines
            .iter()
            .position(|line| !line.is_free && line.product.id == id)
            .ok_or_else(|| CartError::LineNotFound(id.to_string()))?;

        self.lines.remove(idx);

        Ok(())
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Iterate over the lines in order.
    pub fn iter(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.lines.iter()
    }

    /// The lines as a slice.
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cart currency.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn paid_line_mut(&mut self, id: &str) -> Option<&mut CartLine<'a>> {
        self.lines
            .iter_mut()
            .find(|line| !line.is_free && line.product.id == id)
    }
}

fn check_currency(product: &Product<'_>, currency: &'static Currency) -> Result<(), CartError> {
    let product_currency = product.price.currency();

    if product_currency == currency {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch(
            product.id.clone(),
            product_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}

fn check_stock(product: &Product<'_>, requested: u32) -> Result<(), CartError> {
    if i64::from(requested) > product.stock {
        return Err(CartError::InsufficientStock {
            id: product.id.clone(),
            available: product.stock,
            requested,
        });
    }

    Ok(())
}

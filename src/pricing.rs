//! Pricing
//!
//! The promotion pricing engine. [`price`] takes a cart, the promotion list
//! and the catalog and returns the priced cart. It runs in a fixed order:
//!
//! 1. Normalize: drop free lines, restore overridden unit prices, clear labels.
//! 2. Tiered prices: the first active tiered promotion targeting a line sets its
//!    unit price from the highest tier the quantity reaches.
//! 3. Buy X get Y: every (promotion, line) pair with at least one completed set
//!    synthesizes its own free line.
//! 4. Aggregate: paid lines, then free lines; total is `sum(price * quantity)`.
//!
//! Pricing never fails. An unsatisfiable promotion (no tiers, tiers in another
//! currency, zero set size, unknown free SKU) behaves as if it were not
//! configured for that line. Inputs are only read, so the result depends on
//! nothing but the arguments.

use rusty_money::{Money, iso::Currency};
use tracing::{debug, trace};

use crate::{
    cart::{Cart, CartLine},
    products::Catalog,
    promotions::Promotion,
};

/// A cart after pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart<'a> {
    items: Vec<CartLine<'a>>,
    total: Money<'a, Currency>,
    currency: &'static Currency,
}

impl<'a> PricedCart<'a> {
    /// Paid lines followed by free lines.
    pub fn items(&self) -> &[CartLine<'a>] {
        &self.items
    }

    /// Sum of `price * quantity` over all items.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency of the total.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Lines the customer pays for.
    pub fn paid_lines(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.items.iter().filter(|line| !line.is_free)
    }

    /// Bonus lines.
    pub fn free_lines(&self) -> impl Iterator<Item = &CartLine<'a>> {
        self.items.iter().filter(|line| line.is_free)
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total at pre-promotion unit prices, free lines excluded.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        let minor = self
            .items
            .iter()
            .map(CartLine::base_total_minor)
            .fold(0i64, i64::saturating_add);

        Money::from_minor(minor, self.currency())
    }

    /// `subtotal - total`.
    pub fn savings(&self) -> Money<'a, Currency> {
        Money::from_minor(
            self.subtotal()
                .to_minor_units()
                .saturating_sub(self.total.to_minor_units()),
            self.currency(),
        )
    }

    /// Turn the priced items back into a cart, annotations and free lines included.
    pub fn into_cart(self) -> Cart<'a> {
        Cart::from_lines_unchecked(self.items, self.currency)
    }
}

/// Price `cart` against `promotions` and `catalog`.
pub fn price<'a>(
    cart: &Cart<'a>,
    promotions: &[Promotion<'a>],
    catalog: &Catalog<'a>,
) -> PricedCart<'a> {
    let currency = cart.currency();

    let mut lines = normalize(cart.lines());

    apply_tiered_prices(&mut lines, promotions);

    let free_lines = bonus_lines(&lines, promotions, catalog, currency);

    aggregate(lines, free_lines, currency)
}

/// Drop free lines and strip promotion annotations from the rest.
fn normalize<'a>(lines: &[CartLine<'a>]) -> Vec<CartLine<'a>> {
    lines
        .iter()
        .filter(|line| !line.is_free)
        .map(|line| {
            let mut line = line.clone();

            if let Some(original) = line.original_price.take() {
                line.product.price = original;
            }

            line.promotion_applied = None;

            line
        })
        .collect()
}

/// Rewrite unit prices from the first tiered promotion targeting each line.
fn apply_tiered_prices<'a>(lines: &mut [CartLine<'a>], promotions: &[Promotion<'a>]) {
    for line in lines.iter_mut() {
        let currency = line.product.price.currency();

        let winner = promotions.iter().find_map(|promotion| {
            let tiered = promotion.as_tiered()?;

            if !promotion.is_applicable(&line.product) {
                return None;
            }

            if !tiered.is_satisfiable_in(currency) {
                trace!(
                    promotion = %promotion.id,
                    line = %line.product.id,
                    "skipping unsatisfiable tiered promotion"
                );

                return None;
            }

            Some((promotion, tiered))
        });

        let Some((promotion, tiered)) = winner else {
            continue;
        };

        let Some(tier) = tiered.tier_for(line.quantity) else {
            continue;
        };

        debug!(
            promotion = %promotion.id,
            line = %line.product.id,
            min_qty = tier.min_qty,
            "applying tiered price"
        );

        line.original_price = Some(line.product.price);
        line.product.price = tier.price;
        line.promotion_applied = Some(format!("{} ({}+)", promotion.name, tier.min_qty));
    }
}

/// Synthesize one free line per qualifying (promotion, line) pair.
fn bonus_lines<'a>(
    lines: &[CartLine<'a>],
    promotions: &[Promotion<'a>],
    catalog: &Catalog<'a>,
    currency: &'static Currency,
) -> Vec<CartLine<'a>> {
    let mut free_lines = Vec::new();

    for promotion in promotions {
        let Some(bxgy) = promotion.as_buy_x_get_y() else {
            continue;
        };

        for line in lines.iter().filter(|line| promotion.is_applicable(&line.product)) {
            let quantity = bxgy.bonus_qty(line.quantity);

            if quantity == 0 {
                continue;
            }

            let Some(free_product) = catalog
                .find_by_code(bxgy.free_sku())
                .filter(|product| product.price.currency() == currency)
            else {
                trace!(
                    promotion = %promotion.id,
                    free_sku = bxgy.free_sku(),
                    "free product not in catalog"
                );

                continue;
            };

            debug!(
                promotion = %promotion.id,
                line = %line.product.id,
                free_sku = bxgy.free_sku(),
                quantity,
                "adding free line"
            );

            free_lines.push(CartLine::free(
                free_product.clone(),
                quantity,
                promotion.name.clone(),
            ));
        }
    }

    free_lines
}

/// Paid lines followed by free lines, with their total.
fn aggregate<'a>(
    mut lines: Vec<CartLine<'a>>,
    free_lines: Vec<CartLine<'a>>,
    currency: &'static Currency,
) -> PricedCart<'a> {
    lines.extend(free_lines);

    let total = total_price(&lines, currency);

    PricedCart {
        items: lines,
        total,
        currency,
    }
}

/// Sum of `price * quantity` over `lines`.
pub fn total_price<'a>(lines: &[CartLine<'a>], currency: &'static Currency) -> Money<'a, Currency> {
    let minor = lines
        .iter()
        .map(CartLine::line_total_minor)
        .fold(0i64, i64::saturating_add);

    Money::from_minor(minor, currency)
}

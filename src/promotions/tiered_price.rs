//! Tiered Price Promotion
//!
//! Overrides a line's unit price once its quantity reaches a tier's minimum.
//! Multiple tiers can be defined (e.g., 1+ at 100, 10+ at 90); the tier with
//! the highest minimum the quantity reaches is used.

use std::cmp::Reverse;

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

/// A single price tier.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTier<'a> {
    /// Minimum line quantity for this tier
    pub min_qty: u32,

    /// Unit price granted at or above `min_qty`
    pub price: Money<'a, Currency>,
}

impl<'a> PriceTier<'a> {
    /// Create a new price tier.
    pub fn new(min_qty: u32, price: Money<'a, Currency>) -> Self {
        Self { min_qty, price }
    }
}

/// A tiered unit price promotion.
#[derive(Debug, Clone, PartialEq)]
pub struct TieredPricePromotion<'a> {
    tiers: SmallVec<[PriceTier<'a>; 4]>,
}

impl<'a> TieredPricePromotion<'a> {
    /// Create a new tiered price promotion. Tiers may be given in any order.
    pub fn new(tiers: impl IntoIterator<Item = PriceTier<'a>>) -> Self {
        let mut tiers: SmallVec<[PriceTier<'a>; 4]> = tiers.into_iter().collect();

        // Stable, so equal minimums keep their configured order.
        tiers.sort_by_key(|tier| Reverse(tier.min_qty));

        Self { tiers }
    }

    /// Tiers, highest minimum first.
    pub fn tiers(&self) -> &[PriceTier<'a>] {
        &self.tiers
    }

    /// Whether this promotion can ever price a line in `currency`.
    ///
    /// A promotion with no tiers, or with a tier priced in another currency,
    /// is unsatisfiable.
    pub fn is_satisfiable_in(&self, currency: &Currency) -> bool {
        !self.tiers.is_empty() && self.tiers.iter().all(|tier| tier.price.currency() == currency)
    }

    /// The highest tier whose minimum is at most `quantity`.
    pub fn tier_for(&self, quantity: u32) -> Option<&PriceTier<'a>> {
        self.tiers.iter().find(|tier| tier.min_qty <= quantity)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{IDR, USD};

    use super::*;

    fn promo<'a>() -> TieredPricePromotion<'a> {
        TieredPricePromotion::new([
            PriceTier::new(1, Money::from_minor(100, IDR)),
            PriceTier::new(10, Money::from_minor(90, IDR)),
        ])
    }

    #[test]
    fn tiers_are_sorted_descending() {
        let mins: Vec<u32> = promo().tiers().iter().map(|tier| tier.min_qty).collect();

        assert_eq!(mins, vec![10, 1]);
    }

    #[test]
    fn tier_for_picks_highest_reached() {
        let promo = promo();

        let price_at = |qty| promo.tier_for(qty).map(|tier| tier.price.to_minor_units());

        assert_eq!(price_at(9), Some(100));
        assert_eq!(price_at(10), Some(90));
        assert_eq!(price_at(10_000), Some(90));
    }

    #[test]
    fn tier_for_below_smallest_minimum_is_none() {
        let promo = TieredPricePromotion::new([PriceTier::new(5, Money::from_minor(80, IDR))]);

        assert!(promo.tier_for(4).is_none());
    }

    #[test]
    fn empty_or_foreign_tiers_are_unsatisfiable() {
        let empty = TieredPricePromotion::new([]);
        let foreign = TieredPricePromotion::new([PriceTier::new(1, Money::from_minor(1, USD))]);

        assert!(!empty.is_satisfiable_in(IDR));
        assert!(!foreign.is_satisfiable_in(IDR));
        assert!(promo().is_satisfiable_in(IDR));
    }
}

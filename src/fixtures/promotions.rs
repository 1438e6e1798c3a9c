//! Promotion Fixtures

use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, products::parse_money},
    promotions::{
        Promotion, PromotionKind,
        buy_x_get_y::BuyXGetYPromotion,
        targets::TargetSkus,
        tiered_price::{PriceTier, TieredPricePromotion},
    },
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotions in evaluation order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion id
    pub id: String,

    /// Promotion name
    pub name: String,

    /// Whether the promotion is active
    #[serde(default = "default_active")]
    pub active: bool,

    /// Targeted SKUs or ids; empty targets every product
    #[serde(default)]
    pub targets: Vec<String>,

    /// Type-specific configuration
    #[serde(flatten)]
    pub kind: PromotionKindFixture,
}

/// Type-specific promotion configuration, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromotionKindFixture {
    /// Tiered unit pricing
    TieredPrice {
        /// Price tiers
        #[serde(default)]
        tiers: Vec<TierFixture>,
    },

    /// Buy X get Y
    BuyXGetY {
        /// Units per set
        required_qty: u32,

        /// Bonus product SKU
        free_sku: String,

        /// Bonus units per set
        free_qty: u32,
    },
}

/// A price tier in YAML
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Minimum quantity
    pub min_qty: u32,

    /// Unit price (e.g., "3000 IDR")
    pub price: String,
}

fn default_active() -> bool {
    true
}

impl TryFrom<PromotionFixture> for Promotion<'_> {
    type Error = FixtureError;

    fn try_from(fixture: PromotionFixture) -> Result<Self, Self::Error> {
        let kind = match fixture.kind {
            PromotionKindFixture::TieredPrice { tiers } => {
                let tiers = tiers
                    .into_iter()
                    .map(|tier| Ok(PriceTier::new(tier.min_qty, parse_money(&tier.price)?)))
                    .collect::<Result<Vec<_>, FixtureError>>()?;

                PromotionKind::TieredPrice(TieredPricePromotion::new(tiers))
            }
            PromotionKindFixture::BuyXGetY {
                required_qty,
                free_sku,
                free_qty,
            } => PromotionKind::BuyXGetY(BuyXGetYPromotion::new(required_qty, free_sku, free_qty)),
        };

        Ok(Promotion::new(fixture.id, fixture.name, kind)
            .with_active(fixture.active)
            .with_targets(TargetSkus::new(&fixture.targets)))
    }
}

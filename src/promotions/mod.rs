//! Promotions

use crate::{
    products::Product,
    promotions::{
        buy_x_get_y::BuyXGetYPromotion, targets::TargetSkus, tiered_price::TieredPricePromotion,
    },
};

pub mod buy_x_get_y;
pub mod targets;
pub mod tiered_price;

/// Promotion kind with its type-specific configuration
#[derive(Debug, Clone, PartialEq)]
pub enum PromotionKind<'a> {
    /// Tiered unit pricing
    TieredPrice(TieredPricePromotion<'a>),

    /// Buy X, get Y free
    BuyXGetY(BuyXGetYPromotion),
}

/// A promotion snapshot handed to the pricing engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion<'a> {
    /// Promotion id
    pub id: String,

    /// Display name, used in line labels
    pub name: String,

    /// Inactive promotions are ignored
    pub active: bool,

    /// Products the promotion applies to
    pub targets: TargetSkus,

    /// Type-specific configuration
    pub kind: PromotionKind<'a>,
}

impl<'a> Promotion<'a> {
    /// Create an active promotion targeting every product.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: PromotionKind<'a>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            targets: TargetSkus::all(),
            kind,
        }
    }

    /// Create an active tiered price promotion.
    pub fn tiered(
        id: impl Into<String>,
        name: impl Into<String>,
        promotion: TieredPricePromotion<'a>,
    ) -> Self {
        Self::new(id, name, PromotionKind::TieredPrice(promotion))
    }

    /// Create an active buy-X-get-Y promotion.
    pub fn buy_x_get_y(
        id: impl Into<String>,
        name: impl Into<String>,
        promotion: BuyXGetYPromotion,
    ) -> Self {
        Self::new(id, name, PromotionKind::BuyXGetY(promotion))
    }

    /// Restrict the promotion to the given targets.
    #[must_use]
    pub fn with_targets(mut self, targets: TargetSkus) -> Self {
        self.targets = targets;
        self
    }

    /// Set the active flag.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Whether the promotion is active and targets `product`.
    pub fn is_applicable(&self, product: &Product<'_>) -> bool {
        self.active && self.targets.matches(product)
    }

    /// Tiered configuration, if this is a tiered price promotion.
    pub fn as_tiered(&self) -> Option<&TieredPricePromotion<'a>> {
        match &self.kind {
            PromotionKind::TieredPrice(tiered) => Some(tiered),
            PromotionKind::BuyXGetY(_) => None,
        }
    }

    /// Buy-X-get-Y configuration, if this is a buy-X-get-Y promotion.
    pub fn as_buy_x_get_y(&self) -> Option<&BuyXGetYPromotion> {
        match &self.kind {
            PromotionKind::BuyXGetY(bxgy) => Some(bxgy),
            PromotionKind::TieredPrice(_) => None,
        }
    }
}

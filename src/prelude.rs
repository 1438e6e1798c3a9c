//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    checkout::{
        CheckoutError, CheckoutRequest, DiscountType, ManualDiscount, PaymentMethod, SaleLine,
        SaleRecord, SaleStatus, checkout,
    },
    fixtures::{Fixture, FixtureError},
    pricing::{PricedCart, price},
    products::{Catalog, CatalogError, Product},
    promotions::{
        Promotion, PromotionKind,
        buy_x_get_y::BuyXGetYPromotion,
        targets::TargetSkus,
        tiered_price::{PriceTier, TieredPricePromotion},
    },
    receipt::{Receipt, ReceiptError},
    register::{Register, RegisterError},
};

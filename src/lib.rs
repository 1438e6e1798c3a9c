//! Tally
//!
//! Tally is a point-of-sale promotion pricing engine. It prices a cart of
//! catalog products against tiered unit price and buy-X-get-Y promotions,
//! deterministically and without touching its inputs.

pub mod cart;
pub mod checkout;
pub mod fixtures;
pub mod logging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
pub mod register;

//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for a cart in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines in cart order
    pub lines: Vec<LineFixture>,
}

/// A cart line referencing a catalog product by id
#[derive(Debug, Deserialize)]
pub struct LineFixture {
    /// Product id
    pub product: String,

    /// Quantity
    pub quantity: u32,
}

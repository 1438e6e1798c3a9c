//! Buy X Get Y Promotion
//!
//! For every complete set of `required_qty` units on a line, grant `free_qty`
//! units of the product with SKU `free_sku`.

/// A buy-X-get-Y promotion.
#[derive(Debug, Clone, PartialEq)]
pub struct BuyXGetYPromotion {
    required_qty: u32,
    free_sku: String,
    free_qty: u32,
}

impl BuyXGetYPromotion {
    /// Create a new buy-X-get-Y promotion.
    pub fn new(required_qty: u32, free_sku: impl Into<String>, free_qty: u32) -> Self {
        Self {
            required_qty,
            free_sku: free_sku.into(),
            free_qty,
        }
    }

    /// Units that make up one set.
    pub fn required_qty(&self) -> u32 {
        self.required_qty
    }

    /// SKU of the bonus product.
    pub fn free_sku(&self) -> &str {
        &self.free_sku
    }

    /// Bonus units per completed set.
    pub fn free_qty(&self) -> u32 {
        self.free_qty
    }

    /// Completed sets in `quantity` units. Zero when `required_qty` is zero.
    pub fn sets(&self, quantity: u32) -> u32 {
        quantity.checked_div(self.required_qty).unwrap_or(0)
    }

    /// Bonus units earned by `quantity` units.
    pub fn bonus_qty(&self, quantity: u32) -> u32 {
        self.sets(quantity).saturating_mul(self.free_qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_floor_the_quantity() {
        let promo = BuyXGetYPromotion::new(3, "X", 1);

        assert_eq!(promo.sets(7), 2);
        assert_eq!(promo.bonus_qty(7), 2);
        assert_eq!(promo.sets(2), 0);
    }

    #[test]
    fn bonus_scales_with_free_qty() {
        let promo = BuyXGetYPromotion::new(2, "X", 3);

        assert_eq!(promo.bonus_qty(5), 6);
    }

    #[test]
    fn zero_required_qty_never_completes_a_set() {
        let promo = BuyXGetYPromotion::new(0, "X", 1);

        assert_eq!(promo.sets(100), 0);
    }
}

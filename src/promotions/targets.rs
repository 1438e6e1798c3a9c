//! Promotion Targets
//!
//! Which lines a promotion applies to, keyed by product SKU or id.

use smallvec::SmallVec;

use crate::products::Product;

/// A set of SKU/id strings. An empty set targets every product.
///
/// Entries are stored trimmed and lowercased; matching compares them against
/// the lowercased product code and id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetSkus {
    skus: SmallVec<[String; 4]>,
}

impl TargetSkus {
    /// Target every product.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Target the given SKUs or ids.
    pub fn new<I, S>(skus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut skus: SmallVec<[String; 4]> = skus
            .into_iter()
            .map(|sku| sku.as_ref().trim().to_lowercase())
            .collect();

        skus.sort();
        skus.dedup();

        Self { skus }
    }

    /// Create targets from string slices.
    pub fn from_strs(skus: &[&str]) -> Self {
        Self::new(skus.iter())
    }

    /// Whether the promotion applies to every product.
    pub fn is_universal(&self) -> bool {
        self.skus.is_empty()
    }

    /// Whether `product` is targeted, by code or by id.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        if self.is_universal() {
            return true;
        }

        let code = product.code.to_lowercase();
        let id = product.id.trim().to_lowercase();

        self.contains(&code) || self.contains(&id)
    }

    fn contains(&self, normalized: &str) -> bool {
        self.skus
            .binary_search_by(|sku| sku.as_str().cmp(normalized))
            .is_ok()
    }

    /// Normalized entries, sorted.
    pub fn to_strs(&self) -> &[String] {
        &self.skus
    }
}

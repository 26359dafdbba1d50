//! Category discounts
//!
//! Per-category discount metadata. Looked up for display; checkout pricing does not consume
//! it.

use std::collections::BTreeMap;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;

/// Ordered mapping from category name to a percentage discount.
#[derive(Debug, Clone, Default)]
pub struct CategoryDiscountTable {
    discounts: BTreeMap<String, Percentage>,
}

impl CategoryDiscountTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Electronics 10%, Clothes 15%.
    pub fn reference() -> Self {
        let mut table = Self::new();

        table.insert("Electronics", Percentage::from(Decimal::new(10, 2)));
        table.insert("Clothes", Percentage::from(Decimal::new(15, 2)));

        table
    }

    /// Set the discount for a category, returning any previous value.
    pub fn insert(&mut self, category: impl Into<String>, discount: Percentage) -> Option<Percentage> {
        self.discounts.insert(category.into(), discount)
    }

    /// The discount for a category, if one is configured.
    pub fn get(&self, category: &str) -> Option<Percentage> {
        self.discounts.get(category).copied()
    }

    /// The discount for a category, or zero when none is configured.
    pub fn discount_for(&self, category: &str) -> Percentage {
        self.get(category)
            .unwrap_or_else(|| Percentage::from(Decimal::ZERO))
    }

    /// Iterate over categories in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Percentage)> {
        self.discounts
            .iter()
            .map(|(category, discount)| (category.as_str(), *discount))
    }

    /// Number of configured categories.
    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    /// Whether no categories are configured.
    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

//! Category Fixtures

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{
    categories::CategoryDiscountTable,
    fixtures::{FixtureError, products::parse_percentage},
};

/// Wrapper for category discounts in YAML
#[derive(Debug, Deserialize)]
pub struct CategoriesFixture {
    /// Map of category name -> discount (e.g., "15%")
    pub categories: BTreeMap<String, String>,
}

impl TryFrom<CategoriesFixture> for CategoryDiscountTable {
    type Error = FixtureError;

    fn try_from(fixture: CategoriesFixture) -> Result<Self, Self::Error> {
        let mut table = CategoryDiscountTable::new();

        for (category, discount) in fixture.categories {
            table.insert(category, parse_percentage(&discount)?);
        }

        Ok(table)
    }
}

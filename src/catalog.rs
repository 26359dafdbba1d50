//! Catalog

use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, PKR};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    prices::{PriceError, from_major},
    products::{Product, ProductId, ProductKey},
};

/// Errors raised while building a catalog.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// A product with the same identifier is already listed.
    #[error("Product {0} is already listed")]
    DuplicateProduct(ProductId),

    /// A product's currency differs from the catalog currency (product, product currency, catalog currency).
    #[error("Product {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// A product has a negative unit price.
    #[error("Product {0} has a negative price")]
    NegativePrice(ProductId),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Append-only list of purchasable products.
///
/// Products live in a slot-map arena; an id index gives constant-time lookup and a key list
/// keeps listing order stable.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    ids: FxHashMap<ProductId, ProductKey>,
    listing: Vec<ProductKey>,
    currency: Option<&'static Currency>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from a list of products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for duplicate ids, negative prices or mixed currencies.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// The four-product reference catalog, priced in rupees.
    ///
    /// # Errors
    ///
    /// Only fails if the reference prices overflow, which they do not.
    pub fn reference() -> Result<Self, CatalogError> {
        Self::with_products([
            Product::new(1, "Phone", from_major(30_000, PKR)?, "Electronics"),
            Product::new(2, "Laptop", from_major(80_000, PKR)?, "Electronics"),
            Product::new(3, "T-Shirt", from_major(1_500, PKR)?, "Clothes"),
            Product::new(4, "Jeans", from_major(2_500, PKR)?, "Clothes"),
        ])
    }

    /// List a new product.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for duplicate ids, negative prices or mixed currencies.
    pub fn insert(&mut self, product: Product) -> Result<ProductKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateProduct(product.id));
        }

        if product.price.to_minor_units() < 0 {
            return Err(CatalogError::NegativePrice(product.id));
        }

        let product_currency = product.price.currency();

        match self.currency {
            Some(currency) if currency != product_currency => {
                return Err(CatalogError::CurrencyMismatch(
                    product.id,
                    product_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }
            Some(_) => {}
            None => self.currency = Some(product_currency),
        }

        let id = product.id;
        let key = self.products.insert(product);

        self.ids.insert(id, key);
        self.listing.push(key);

        Ok(key)
    }

    /// Look up a product by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.ids.get(&id).and_then(|key| self.products.get(*key))
    }

    /// Look up a product by slot key.
    pub fn get_by_key(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Products whose name contains `needle`, in listing order.
    pub fn search<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.iter().filter(move |product| product.name_contains(needle))
    }

    /// Iterate over products in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.listing.iter().filter_map(|key| self.products.get(*key))
    }

    /// Number of listed products.
    pub fn len(&self) -> usize {
        self.listing.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.listing.is_empty()
    }

    /// Currency shared by every listed product, once one has been listed.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn reference_catalog_lists_four_products_in_order() -> TestResult {
        let catalog = Catalog::reference()?;

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["Phone", "Laptop", "T-Shirt", "Jeans"]);
        assert_eq!(catalog.currency(), Some(PKR));

        Ok(())
    }

    #[test]
    fn get_finds_by_id() -> TestResult {
        let catalog = Catalog::reference()?;

        let laptop = catalog.get(ProductId::new(2)).ok_or("laptop missing")?;

        assert_eq!(laptop.name, "Laptop");
        assert_eq!(laptop.price, Money::from_minor(8_000_000, PKR));
        assert!(catalog.get(ProductId::new(99)).is_none());

        Ok(())
    }

    #[test]
    fn insert_rejects_duplicate_ids() -> TestResult {
        let mut catalog = Catalog::reference()?;

        let result = catalog.insert(Product::new(1, "Tablet", Money::from_minor(1, PKR), "Electronics"));

        assert_eq!(result, Err(CatalogError::DuplicateProduct(ProductId::new(1))));
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn insert_rejects_currency_mismatch() -> TestResult {
        let mut catalog = Catalog::reference()?;

        let result = catalog.insert(Product::new(5, "Scarf", Money::from_minor(100, GBP), "Clothes"));

        assert_eq!(
            result,
            Err(CatalogError::CurrencyMismatch(ProductId::new(5), "GBP", "PKR"))
        );

        Ok(())
    }

    #[test]
    fn insert_rejects_negative_prices() {
        let mut catalog = Catalog::new();

        let result = catalog.insert(Product::new(1, "Refund", Money::from_minor(-1, GBP), "Other"));

        assert_eq!(result, Err(CatalogError::NegativePrice(ProductId::new(1))));
        assert!(catalog.is_empty());
    }

    #[test]
    fn search_matches_substrings() -> TestResult {
        let catalog = Catalog::reference()?;

        let hits: Vec<ProductId> = catalog.search("a").map(|p| p.id).collect();

        assert_eq!(hits, [ProductId::new(2), ProductId::new(4)]);
        assert_eq!(catalog.search("Watch").count(), 0);

        Ok(())
    }

    #[test]
    fn get_by_key_returns_inserted_product() -> TestResult {
        let mut catalog = Catalog::new();

        let key = catalog.insert(Product::new(9, "Socks", Money::from_minor(300, GBP), "Clothes"))?;

        assert_eq!(catalog.get_by_key(key).map(|p| p.id), Some(ProductId::new(9)));

        Ok(())
    }
}

//! Fixtures
//!
//! YAML-backed stores. A set named `<set>` is read from
//! `<base>/products/<set>.yml`, `<base>/categories/<set>.yml` and
//! `<base>/policies/<set>.yml`.

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    categories::CategoryDiscountTable,
    checkout::PricingPolicy,
    fixtures::{
        categories::CategoriesFixture, policies::PoliciesFixture, products::ProductsFixture,
    },
    products::Product,
    session::{Session, SessionConfig},
};

pub mod categories;
pub mod policies;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Invalid pricing policy
    #[error("Invalid pricing policy: {0}")]
    InvalidPolicy(String),

    /// Currency mismatch between products and policy
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// No pricing policy loaded yet
    #[error("No pricing policy loaded")]
    NoPolicy,

    /// Catalog rejected a product
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Catalog,
    categories: CategoryDiscountTable,
    policy: Option<PricingPolicy>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            categories: CategoryDiscountTable::new(),
            policy: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the catalog rejects a product.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        for product_fixture in fixture.products {
            let product: Product = product_fixture.try_into()?;

            self.catalog.insert(product)?;
        }

        debug!(set = name, products = self.catalog.len(), "loaded products");

        Ok(self)
    }

    /// Load category discounts from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a discount is invalid.
    pub fn load_categories(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CategoriesFixture = self.read("categories", name)?;

        for (category, discount) in CategoryDiscountTable::try_from(fixture)?.iter() {
            self.categories.insert(category, discount);
        }

        debug!(set = name, categories = self.categories.len(), "loaded categories");

        Ok(self)
    }

    /// Load the pricing policy from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, the policy is invalid, or its
    /// currency differs from the loaded products.
    pub fn load_policy(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: PoliciesFixture = self.read("policies", name)?;
        let policy = PricingPolicy::try_from(fixture.policy)?;

        if let Some(currency) = self.catalog.currency()
            && currency != policy.currency()
        {
            return Err(FixtureError::CurrencyMismatch(
                currency.iso_alpha_code.to_string(),
                policy.currency().iso_alpha_code.to_string(),
            ));
        }

        debug!(set = name, currency = policy.currency().iso_alpha_code, "loaded policy");

        self.policy = Some(policy);

        Ok(self)
    }

    /// Load a complete fixture set (products, categories and policy with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_products(name)?
            .load_categories(name)?
            .load_policy(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the loaded category discounts
    pub fn categories(&self) -> &CategoryDiscountTable {
        &self.categories
    }

    /// Get the loaded pricing policy
    ///
    /// # Errors
    ///
    /// Returns an error if no policy has been loaded yet.
    pub fn policy(&self) -> Result<&PricingPolicy, FixtureError> {
        self.policy.as_ref().ok_or(FixtureError::NoPolicy)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.catalog.currency().ok_or(FixtureError::NoCurrency)
    }

    /// Start a shopping session over the loaded stores
    ///
    /// # Errors
    ///
    /// Returns an error if no policy has been loaded yet.
    pub fn into_session(self, config: SessionConfig) -> Result<Session, FixtureError> {
        let policy = self.policy.ok_or(FixtureError::NoPolicy)?;

        Ok(Session::new(self.catalog, self.categories, policy, config))
    }

    fn read<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

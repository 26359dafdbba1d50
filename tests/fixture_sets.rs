//! Loading fixture sets from disk and trading under them.

use std::fs;

use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use emporium::{
    fixtures::{Fixture, FixtureError},
    products::ProductId,
    session::{Session, SessionConfig},
};

#[test]
fn default_set_prices_like_reference_data() -> TestResult {
    let mut from_fixtures = Fixture::from_set("default")?.into_session(SessionConfig::default())?;
    let mut reference = Session::reference(SessionConfig::default())?;

    for session in [&mut from_fixtures, &mut reference] {
        session.add_to_cart(ProductId::new(1), 3)?;
        session.add_to_cart(ProductId::new(3), 3)?;
    }

    let loaded = from_fixtures.checkout()?;
    let expected = reference.checkout()?;

    assert_eq!(loaded.quote(), expected.quote());
    assert_eq!(
        from_fixtures.categories().iter().collect::<Vec<_>>(),
        reference.categories().iter().collect::<Vec<_>>()
    );

    Ok(())
}

#[test]
fn custom_set_in_pounds() -> TestResult {
    let dir = tempfile::tempdir()?;

    for (kind, contents) in [
        (
            "products",
            "products:\n  - id: 10\n    name: Scarf\n    price: \"12.50 GBP\"\n    category: Accessories\n",
        ),
        ("categories", "categories:\n  Accessories: \"5%\"\n"),
        (
            "policies",
            "policy:\n  bundle_category: Accessories\n  bundle_size: 2\n  bulk_min_quantity: 10\n  bulk_discount: \"10%\"\n  large_order_threshold: \"100 GBP\"\n  large_order_discount: \"5%\"\n  free_delivery_threshold: \"30 GBP\"\n  delivery_surcharge: \"2.99 GBP\"\n",
        ),
    ] {
        fs::create_dir_all(dir.path().join(kind))?;
        fs::write(dir.path().join(kind).join("winter.yml"), contents)?;
    }

    let mut session =
        Fixture::from_set_in(dir.path(), "winter")?.into_session(SessionConfig::default())?;

    // 2-for-1 leaves one payable scarf: 12.50 + 2.99 delivery
    session.add_to_cart(ProductId::new(10), 2)?;
    let order = session.checkout()?;

    assert_eq!(order.total(), Money::from_minor(1_549, GBP));
    assert!(!order.quote().free_delivery());

    Ok(())
}

#[test]
fn unknown_set_fails_to_load() {
    let result = Fixture::from_set("no-such-set");

    assert!(matches!(result, Err(FixtureError::Io(_))));
}

//! Emporium prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntry},
    catalog::{Catalog, CatalogError},
    categories::CategoryDiscountTable,
    checkout::{CheckoutEngine, CheckoutError, LineQuote, PricingPolicy, Quote},
    delivery::DeliveryEstimate,
    fixtures::{Fixture, FixtureError},
    menu::{Action, Menu, MenuError},
    orders::{Order, OrderId, OrderSink},
    prices::{Price, PriceError},
    products::{Product, ProductId, ProductKey},
    receipt::ReceiptError,
    session::{Session, SessionConfig, SessionError},
    undo::{AddReversalMode, UndoLog, UndoRecord},
};

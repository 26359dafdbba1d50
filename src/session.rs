//! Shopping session
//!
//! A [`Session`] owns one shopper's cart, undo history and order sink, together with the
//! catalog, category table and pricing policy it trades under. Every operation runs to
//! completion synchronously; rejected operations leave all state untouched.

use decimal_percentage::Percentage;
use rusty_money::iso::PKR;
use thiserror::Error;
use tracing::{Level, debug, info};

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogError},
    categories::CategoryDiscountTable,
    checkout::{CheckoutEngine, CheckoutError, PricingPolicy, Quote},
    orders::{Order, OrderIds, OrderSink},
    prices::PriceError,
    products::{Product, ProductId},
    undo::{AddReversalMode, UndoLog, UndoRecord},
};

/// Expected, recoverable outcomes of session operations.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The catalog has no product with this id.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The cart has no entry for this id.
    #[error("Item {0} not found in cart")]
    ItemNotFound(ProductId),

    /// Quantities added to the cart must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The undo history is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// No orders are waiting to be processed.
    #[error("no orders in queue")]
    QueueEmpty,

    /// Pricing failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Building the catalog failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Price arithmetic failed.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Behavioural switches for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// How undoing an add is applied.
    pub add_reversal: AddReversalMode,

    /// Discard the undo history after each successful checkout.
    pub clear_undo_on_checkout: bool,
}

/// One shopper's state and the stores it trades against.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    categories: CategoryDiscountTable,
    engine: CheckoutEngine,
    cart: Cart,
    undo: UndoLog,
    orders: OrderSink,
    order_ids: OrderIds,
    config: SessionConfig,
}

impl Session {
    /// Create a session with an empty cart, history and queue.
    pub fn new(
        catalog: Catalog,
        categories: CategoryDiscountTable,
        policy: PricingPolicy,
        config: SessionConfig,
    ) -> Self {
        Self {
            catalog,
            categories,
            engine: CheckoutEngine::new(policy),
            cart: Cart::new(),
            undo: UndoLog::with_mode(config.add_reversal),
            orders: OrderSink::new(),
            order_ids: OrderIds::new(),
            config,
        }
    }

    /// A session over the reference catalog, category table and pricing policy.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] if the reference data cannot be built.
    pub fn reference(config: SessionConfig) -> Result<Self, SessionError> {
        Ok(Self::new(
            Catalog::reference()?,
            CategoryDiscountTable::reference(),
            PricingPolicy::reference(PKR)?,
            config,
        ))
    }

    /// Add `quantity` units of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidQuantity`]: `quantity` is zero.
    /// - [`SessionError::ProductNotFound`]: the catalog has no such product.
    #[tracing::instrument(
        name = "session.add_to_cart",
        skip(self, id),
        fields(product_id = %id),
        err(level = Level::DEBUG)
    )]
    pub fn add_to_cart(&mut self, id: ProductId, quantity: u32) -> Result<(), SessionError> {
        if quantity == 0 {
            return Err(SessionError::InvalidQuantity);
        }

        let product = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(SessionError::ProductNotFound(id))?;

        self.cart.add_item(product.clone(), quantity);
        self.undo.record_add(product, quantity);

        debug!(
            cart_quantity = self.cart.quantity_of(id),
            undo_depth = self.undo.len(),
            "added to cart"
        );

        Ok(())
    }

    /// Replace the quantity of a cart entry. Zero removes the entry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ItemNotFound`] if the cart has no entry for `id`.
    #[tracing::instrument(
        name = "session.update_quantity",
        skip(self, id),
        fields(product_id = %id),
        err(level = Level::DEBUG)
    )]
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), SessionError> {
        let entry = self
            .cart
            .find_by_id(id)
            .ok_or(SessionError::ItemNotFound(id))?;

        let product = entry.product().clone();
        let previous_quantity = entry.quantity();

        self.undo.record_set(product, previous_quantity);
        self.cart.set_quantity(id, quantity);

        debug!(previous_quantity, undo_depth = self.undo.len(), "updated quantity");

        Ok(())
    }

    /// Reverse the most recent cart mutation.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingToUndo`] if the history is empty.
    #[tracing::instrument(name = "session.undo", skip(self), err(level = Level::DEBUG))]
    pub fn undo(&mut self) -> Result<UndoRecord, SessionError> {
        let record = self
            .undo
            .undo_last(&mut self.cart)
            .ok_or(SessionError::NothingToUndo)?;

        debug!(
            product_id = %record.product().id,
            undo_depth = self.undo.len(),
            "undid cart mutation"
        );

        Ok(record)
    }

    /// Empty the cart. The undo history is kept.
    pub fn clear_cart(&mut self) {
        self.cart.clear();

        debug!("cleared cart");
    }

    /// Price the current cart without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyCart`] for an empty cart, or a pricing error.
    pub fn quote(&self) -> Result<Quote, SessionError> {
        if self.cart.is_empty() {
            return Err(SessionError::EmptyCart);
        }

        Ok(self.engine.quote(&self.cart.snapshot())?)
    }

    /// Turn the cart into an order, empty the cart and queue the order for processing.
    ///
    /// Order ids are only allocated once pricing has succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyCart`] for an empty cart, or a pricing error.
    #[tracing::instrument(
        name = "session.checkout",
        skip(self),
        fields(order_id = tracing::field::Empty),
        err(level = Level::DEBUG)
    )]
    pub fn checkout(&mut self) -> Result<Order, SessionError> {
        let entries = self.cart.snapshot();

        if entries.is_empty() {
            return Err(SessionError::EmptyCart);
        }

        let quote = self.engine.quote(&entries)?;
        let order = Order::new(self.order_ids.allocate(), entries, quote);

        tracing::Span::current().record("order_id", tracing::field::display(order.id()));

        self.cart.clear();

        if self.config.clear_undo_on_checkout {
            self.undo.clear();
        }

        self.orders.record_order(order.clone());

        info!(
            total = %order.total(),
            free_delivery = order.quote().free_delivery(),
            queued = self.orders.queued_len(),
            "placed order"
        );

        Ok(order)
    }

    /// Take the oldest queued order off the processing queue.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::QueueEmpty`] if no orders are waiting.
    pub fn process_next_order(&mut self) -> Result<Order, SessionError> {
        let order = self
            .orders
            .dequeue_next()
            .cloned()
            .ok_or(SessionError::QueueEmpty)?;

        info!(order_id = %order.id(), "processed order");

        Ok(order)
    }

    /// The oldest queued order, if any.
    pub fn peek_next_order(&self) -> Option<&Order> {
        self.orders.peek_next()
    }

    /// Catalog products whose name contains `needle`.
    pub fn search_products<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
        self.catalog.search(needle)
    }

    /// Discount configured for a category, zero when none is.
    pub fn category_discount(&self, category: &str) -> Percentage {
        self.categories.discount_for(category)
    }

    /// Current cart contents.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Products on offer.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Category discount metadata.
    pub fn categories(&self) -> &CategoryDiscountTable {
        &self.categories
    }

    /// Completed orders, both history and processing queue.
    pub fn orders(&self) -> &OrderSink {
        &self.orders
    }

    /// Undo history.
    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    /// Pricing policy in force.
    pub fn policy(&self) -> &PricingPolicy {
        self.engine.policy()
    }

    /// Behavioural switches.
    pub fn config(&self) -> SessionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::prices;

    use super::*;

    const PHONE: ProductId = ProductId::new(1);
    const LAPTOP: ProductId = ProductId::new(2);
    const T_SHIRT: ProductId = ProductId::new(3);

    fn session() -> Result<Session, SessionError> {
        Session::reference(SessionConfig::default())
    }

    #[test]
    fn add_to_cart_records_undo() -> TestResult {
        let mut session = session()?;

        session.add_to_cart(PHONE, 2)?;

        assert_eq!(session.cart().quantity_of(PHONE), 2);
        assert_eq!(session.undo_log().len(), 1);

        Ok(())
    }

    #[test]
    fn add_unknown_product_changes_nothing() -> TestResult {
        let mut session = session()?;

        let result = session.add_to_cart(ProductId::new(42), 1);

        assert_eq!(result, Err(SessionError::ProductNotFound(ProductId::new(42))));
        assert!(session.cart().is_empty());
        assert!(session.undo_log().is_empty());

        Ok(())
    }

    #[test]
    fn add_zero_quantity_is_rejected() -> TestResult {
        let mut session = session()?;

        assert_eq!(session.add_to_cart(PHONE, 0), Err(SessionError::InvalidQuantity));
        assert!(session.undo_log().is_empty());

        Ok(())
    }

    #[test]
    fn update_missing_item_changes_nothing() -> TestResult {
        let mut session = session()?;
        session.add_to_cart(PHONE, 1)?;

        let result = session.update_quantity(LAPTOP, 3);

        assert_eq!(result, Err(SessionError::ItemNotFound(LAPTOP)));
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.undo_log().len(), 1);

        Ok(())
    }

    #[test]
    fn update_then_undo_restores_quantity() -> TestResult {
        let mut session = session()?;
        session.add_to_cart(PHONE, 5)?;

        session.update_quantity(PHONE, 2)?;
        assert_eq!(session.cart().quantity_of(PHONE), 2);

        session.undo()?;
        assert_eq!(session.cart().quantity_of(PHONE), 5);

        Ok(())
    }

    #[test]
    fn undo_on_fresh_session_reports_nothing_to_undo() -> TestResult {
        let mut session = session()?;

        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));
        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));
        assert!(session.cart().is_empty());

        Ok(())
    }

    #[test]
    fn decrement_mode_is_honoured() -> TestResult {
        let mut session = Session::reference(SessionConfig {
            add_reversal: AddReversalMode::Decrement,
            ..SessionConfig::default()
        })?;

        session.add_to_cart(PHONE, 2)?;
        session.add_to_cart(PHONE, 1)?;
        session.undo()?;

        assert_eq!(session.cart().quantity_of(PHONE), 2);

        Ok(())
    }

    #[test]
    fn checkout_clears_cart_and_queues_order() -> TestResult {
        let mut session = session()?;
        session.add_to_cart(T_SHIRT, 1)?;

        let order = session.checkout()?;

        assert_eq!(order.id().get(), 1);
        assert_eq!(order.total(), prices::from_major(1_700, PKR)?);
        assert!(session.cart().is_empty());
        assert_eq!(session.orders().history().len(), 1);
        assert_eq!(session.peek_next_order().map(Order::id), Some(order.id()));

        Ok(())
    }

    #[test]
    fn failed_checkouts_do_not_consume_ids() -> TestResult {
        let mut session = session()?;

        assert_eq!(session.checkout(), Err(SessionError::EmptyCart));

        session.add_to_cart(PHONE, 1)?;
        let first = session.checkout()?;

        assert_eq!(session.checkout(), Err(SessionError::EmptyCart));

        session.add_to_cart(LAPTOP, 1)?;
        let second = session.checkout()?;

        assert_eq!(first.id().get(), 1);
        assert_eq!(second.id().get(), 2);
        assert!(session.orders().history().iter().all(|o| o.id().get() <= 2));

        Ok(())
    }

    #[test]
    fn undo_after_checkout_is_a_no_op_on_the_cleared_cart() -> TestResult {
        let mut session = session()?;
        session.add_to_cart(PHONE, 2)?;
        session.update_quantity(PHONE, 4)?;
        session.checkout()?;

        assert!(matches!(session.undo()?, UndoRecord::SetReversal { .. }));
        assert!(matches!(session.undo()?, UndoRecord::AddReversal { .. }));
        assert!(session.cart().is_empty());
        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));

        Ok(())
    }

    #[test]
    fn clear_undo_on_checkout_prunes_history() -> TestResult {
        let mut session = Session::reference(SessionConfig {
            clear_undo_on_checkout: true,
            ..SessionConfig::default()
        })?;
        session.add_to_cart(PHONE, 1)?;
        session.checkout()?;

        assert_eq!(session.undo(), Err(SessionError::NothingToUndo));

        Ok(())
    }

    #[test]
    fn process_next_order_keeps_history() -> TestResult {
        let mut session = session()?;
        session.add_to_cart(PHONE, 1)?;
        session.checkout()?;
        session.add_to_cart(LAPTOP, 1)?;
        session.checkout()?;

        assert_eq!(session.process_next_order()?.id().get(), 1);
        assert_eq!(session.process_next_order()?.id().get(), 2);
        assert_eq!(session.process_next_order(), Err(SessionError::QueueEmpty));
        assert_eq!(session.orders().history().len(), 2);

        Ok(())
    }

    #[test]
    fn clear_cart_keeps_undo_history() -> TestResult {
        let mut session = session()?;
        session.add_to_cart(PHONE, 1)?;

        session.clear_cart();

        assert!(session.cart().is_empty());
        assert_eq!(session.undo_log().len(), 1);

        Ok(())
    }

    #[test]
    fn quote_previews_without_side_effects() -> TestResult {
        let mut session = session()?;

        assert_eq!(session.quote(), Err(SessionError::EmptyCart));

        session.add_to_cart(PHONE, 2)?;
        let quote = session.quote()?;

        assert_eq!(quote.total(), prices::from_major(57_000, PKR)?);
        assert_eq!(session.cart().quantity_of(PHONE), 2);
        assert!(session.orders().history().is_empty());

        Ok(())
    }

    #[test]
    fn search_and_category_lookup() -> TestResult {
        let session = session()?;

        let names: Vec<&str> = session.search_products("Jeans").map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["Jeans"]);
        assert_eq!(
            session.category_discount("Electronics"),
            Percentage::from(Decimal::new(10, 2))
        );
        assert_eq!(
            session.category_discount("Toys"),
            Percentage::from(Decimal::ZERO)
        );

        Ok(())
    }
}

//! Orders

use std::{collections::VecDeque, fmt};

use crate::{cart::CartEntry, checkout::Quote, prices::Price};

/// Sequential order number, starting at one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrderId(u64);

impl OrderId {
    /// The raw order number.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out order ids. Ids are only consumed by successful checkouts.
#[derive(Debug, Clone)]
pub struct OrderIds {
    next: u64,
}

impl Default for OrderIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl OrderIds {
    /// Start numbering at one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next call to [`OrderIds::allocate`] will return.
    pub fn peek(&self) -> OrderId {
        OrderId(self.next)
    }

    /// Take the next id.
    pub fn allocate(&mut self) -> OrderId {
        let id = OrderId(self.next);
        self.next = self.next.saturating_add(1);

        id
    }
}

/// A completed, priced checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    entries: Vec<CartEntry>,
    quote: Quote,
}

impl Order {
    /// Create an order from a cart snapshot and its quote.
    pub fn new(id: OrderId, entries: Vec<CartEntry>, quote: Quote) -> Self {
        Self { id, entries, quote }
    }

    /// Order number
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Cart entries at checkout time.
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Pricing breakdown.
    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    /// Final amount charged.
    pub fn total(&self) -> Price {
        self.quote.total()
    }
}

/// Receives completed orders: an append-only history plus a FIFO processing queue.
///
/// The queue holds positions in the history, so a dequeued order stays in the history.
#[derive(Debug, Clone, Default)]
pub struct OrderSink {
    history: Vec<Order>,
    queue: VecDeque<usize>,
}

impl OrderSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `order` to the history and queue it for processing.
    pub fn record_order(&mut self, order: Order) -> OrderId {
        let id = order.id;

        self.queue.push_back(self.history.len());
        self.history.push(order);

        id
    }

    /// Remove and return the oldest queued order.
    pub fn dequeue_next(&mut self) -> Option<&Order> {
        let position = self.queue.pop_front()?;

        self.history.get(position)
    }

    /// The oldest queued order, without removing it.
    pub fn peek_next(&self) -> Option<&Order> {
        self.queue
            .front()
            .and_then(|position| self.history.get(*position))
    }

    /// Every recorded order, oldest first.
    pub fn history(&self) -> &[Order] {
        &self.history
    }

    /// Look up an order by id.
    pub fn find(&self, id: OrderId) -> Option<&Order> {
        self.history.iter().find(|order| order.id == id)
    }

    /// Orders still waiting to be processed.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// Orders waiting in the queue, oldest first.
    pub fn queued(&self) -> impl Iterator<Item = &Order> {
        self.queue
            .iter()
            .filter_map(|position| self.history.get(*position))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::PKR;
    use testresult::TestResult;

    use crate::{
        checkout::{CheckoutEngine, PricingPolicy},
        prices,
        products::Product,
    };

    use super::*;

    fn order(ids: &mut OrderIds, quantity: u32) -> TestResult<Order> {
        let product = Product::new(1, "Phone", prices::from_major(30_000, PKR)?, "Electronics");
        let entries = vec![CartEntry::new(product, quantity)];
        let quote = CheckoutEngine::new(PricingPolicy::reference(PKR)?).quote(&entries)?;

        Ok(Order::new(ids.allocate(), entries, quote))
    }

    #[test]
    fn order_ids_start_at_one_and_increase() {
        let mut ids = OrderIds::new();

        assert_eq!(ids.peek().get(), 1);
        assert_eq!(ids.allocate().get(), 1);
        assert_eq!(ids.allocate().get(), 2);
        assert_eq!(ids.peek().get(), 3);
    }

    #[test]
    fn order_id_displays_with_hash() {
        assert_eq!(OrderIds::new().allocate().to_string(), "#1");
    }

    #[test]
    fn queue_is_fifo() -> TestResult {
        let mut ids = OrderIds::new();
        let mut sink = OrderSink::new();

        sink.record_order(order(&mut ids, 1)?);
        sink.record_order(order(&mut ids, 2)?);

        assert_eq!(sink.peek_next().map(Order::id), Some(OrderId(1)));
        assert_eq!(sink.dequeue_next().map(Order::id), Some(OrderId(1)));
        assert_eq!(sink.dequeue_next().map(Order::id), Some(OrderId(2)));
        assert!(sink.dequeue_next().is_none());
        assert!(sink.peek_next().is_none());

        Ok(())
    }

    #[test]
    fn dequeued_orders_stay_in_history() -> TestResult {
        let mut ids = OrderIds::new();
        let mut sink = OrderSink::new();

        sink.record_order(order(&mut ids, 1)?);
        sink.dequeue_next();

        assert_eq!(sink.queued_len(), 0);
        assert_eq!(sink.history().len(), 1);
        assert!(sink.find(OrderId(1)).is_some());

        Ok(())
    }

    #[test]
    fn peek_does_not_remove() -> TestResult {
        let mut ids = OrderIds::new();
        let mut sink = OrderSink::new();

        sink.record_order(order(&mut ids, 1)?);

        assert!(sink.peek_next().is_some());
        assert!(sink.peek_next().is_some());
        assert_eq!(sink.queued_len(), 1);
        assert_eq!(sink.queued().count(), 1);

        Ok(())
    }

    #[test]
    fn order_total_comes_from_quote() -> TestResult {
        let mut ids = OrderIds::new();

        let order = order(&mut ids, 1)?;

        assert_eq!(order.total(), prices::from_major(30_000, PKR)?);
        assert_eq!(order.entries().len(), 1);

        Ok(())
    }
}

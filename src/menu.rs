//! Interactive menu
//!
//! Drives a [`Session`] from line-oriented input: a numbered action per prompt, with any
//! follow-up values read on their own lines. End of input behaves like choosing exit.

use std::{
    fmt,
    io::{self, BufRead, Write},
    str::FromStr,
};

use rand::Rng;
use thiserror::Error;

use crate::{
    delivery::DeliveryEstimate,
    products::ProductId,
    receipt::{self, ReceiptError},
    session::{Session, SessionError},
};

/// Errors that end the menu loop.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Reading input or writing output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Rendering a receipt failed.
    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// The menu's numbered actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// List the catalog.
    ViewProducts,
    /// Add units of a product to the cart.
    AddToCart,
    /// Show the cart and its current total.
    ViewCart,
    /// Reverse the last cart change.
    Undo,
    /// Place an order for the cart.
    Checkout,
    /// Take the oldest order off the queue.
    ProcessNextOrder,
    /// Leave the menu.
    Exit,
    /// Find products by name.
    SearchProduct,
    /// Replace a cart line's quantity.
    UpdateQuantity,
    /// Empty the cart.
    ClearCart,
    /// List every placed order.
    OrderHistory,
    /// Estimate delivery time.
    DeliveryEstimate,
}

impl Action {
    /// Every action in menu order.
    pub const ALL: [Action; 12] = [
        Action::ViewProducts,
        Action::AddToCart,
        Action::ViewCart,
        Action::Undo,
        Action::Checkout,
        Action::ProcessNextOrder,
        Action::Exit,
        Action::SearchProduct,
        Action::UpdateQuantity,
        Action::ClearCart,
        Action::OrderHistory,
        Action::DeliveryEstimate,
    ];

    /// The number the action is chosen by.
    pub fn number(self) -> u8 {
        match self {
            Action::ViewProducts => 1,
            Action::AddToCart => 2,
            Action::ViewCart => 3,
            Action::Undo => 4,
            Action::Checkout => 5,
            Action::ProcessNextOrder => 6,
            Action::Exit => 7,
            Action::SearchProduct => 8,
            Action::UpdateQuantity => 9,
            Action::ClearCart => 10,
            Action::OrderHistory => 11,
            Action::DeliveryEstimate => 12,
        }
    }

    /// The action chosen by `number`, if any.
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.number() == number)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::ViewProducts => "View Products",
            Action::AddToCart => "Add to Cart",
            Action::ViewCart => "View Cart",
            Action::Undo => "Undo Last Action",
            Action::Checkout => "Checkout",
            Action::ProcessNextOrder => "Process Next Order",
            Action::Exit => "Exit",
            Action::SearchProduct => "Search Product",
            Action::UpdateQuantity => "Update Quantity",
            Action::ClearCart => "Clear Cart",
            Action::OrderHistory => "Order History",
            Action::DeliveryEstimate => "Delivery Estimate",
        };

        f.write_str(label)
    }
}

/// Whether the loop keeps going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the menu again.
    Continue,
    /// Stop the loop.
    Exit,
}

enum Answer<T> {
    Value(T),
    Invalid,
    Closed,
}

/// Line-driven front end over a borrowed [`Session`].
#[derive(Debug)]
pub struct Menu<'s, R, W, G> {
    session: &'s mut Session,
    input: R,
    out: W,
    rng: G,
}

impl<'s, R: BufRead, W: Write, G: Rng> Menu<'s, R, W, G> {
    /// Create a menu reading from `input`, writing to `out` and drawing delivery estimates
    /// from `rng`.
    pub fn new(session: &'s mut Session, input: R, out: W, rng: G) -> Self {
        Self {
            session,
            input,
            out,
            rng,
        }
    }

    /// Show the menu and perform chosen actions until exit or end of input.
    ///
    /// # Errors
    ///
    /// Returns a [`MenuError`] if input or output fails.
    pub fn run(&mut self) -> Result<(), MenuError> {
        loop {
            self.write_menu()?;

            let Some(line) = self.prompt("Enter choice: ")? else {
                return Ok(());
            };

            let Some(action) = line.parse().ok().and_then(Action::from_number) else {
                writeln!(self.out, "Invalid choice!")?;
                continue;
            };

            if self.perform(action)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Perform a single action, prompting for whatever it needs.
    ///
    /// Rejected session operations are reported on the output and do not end the loop.
    ///
    /// # Errors
    ///
    /// Returns a [`MenuError`] if input or output fails.
    pub fn perform(&mut self, action: Action) -> Result<Flow, MenuError> {
        match action {
            Action::ViewProducts => {
                receipt::write_catalog(
                    &mut self.out,
                    self.session.catalog(),
                    self.session.categories(),
                )?;
            }
            Action::AddToCart => return self.add_to_cart(),
            Action::ViewCart => self.view_cart()?,
            Action::Undo => match self.session.undo() {
                Ok(record) => {
                    writeln!(self.out, "Undo successful ({}).", record.product().name)?;
                }
                Err(error) => self.report(&error)?,
            },
            Action::Checkout => match self.session.checkout() {
                Ok(order) => {
                    writeln!(self.out, "Order Placed Successfully!")?;
                    receipt::write_order(&mut self.out, &order)?;
                }
                Err(error) => self.report(&error)?,
            },
            Action::ProcessNextOrder => match self.session.process_next_order() {
                Ok(order) => {
                    writeln!(self.out, "Processing next order...")?;
                    receipt::write_order(&mut self.out, &order)?;
                }
                Err(error) => self.report(&error)?,
            },
            Action::Exit => {
                writeln!(self.out, "Goodbye!")?;

                return Ok(Flow::Exit);
            }
            Action::SearchProduct => return self.search(),
            Action::UpdateQuantity => return self.update_quantity(),
            Action::ClearCart => {
                self.session.clear_cart();
                writeln!(self.out, "Cart cleared.")?;
            }
            Action::OrderHistory => receipt::write_history(&mut self.out, self.session.orders())?,
            Action::DeliveryEstimate => {
                let estimate = DeliveryEstimate::estimate(&mut self.rng);
                writeln!(self.out, "Estimated Delivery: {estimate}.")?;
            }
        }

        Ok(Flow::Continue)
    }

    fn add_to_cart(&mut self) -> Result<Flow, MenuError> {
        let Some((id, quantity)) = self.read_line_change("Enter quantity: ")? else {
            return Ok(Flow::Exit);
        };

        match self.session.add_to_cart(id, quantity) {
            Ok(()) => {
                let name = self
                    .session
                    .catalog()
                    .get(id)
                    .map(|product| product.name.as_str())
                    .unwrap_or_default();

                writeln!(self.out, "Added {quantity} x {name} to cart.")?;
            }
            Err(error) => self.report(&error)?,
        }

        Ok(Flow::Continue)
    }

    fn update_quantity(&mut self) -> Result<Flow, MenuError> {
        let Some((id, quantity)) = self.read_line_change("Enter new quantity: ")? else {
            return Ok(Flow::Exit);
        };

        match self.session.update_quantity(id, quantity) {
            Ok(()) => writeln!(self.out, "Quantity updated.")?,
            Err(error) => self.report(&error)?,
        }

        Ok(Flow::Continue)
    }

    fn view_cart(&mut self) -> Result<(), MenuError> {
        receipt::write_cart(&mut self.out, self.session.cart())?;

        if self.session.cart().is_empty() {
            return Ok(());
        }

        match self.session.quote() {
            Ok(quote) => writeln!(self.out, "Total at checkout: {}", quote.total())?,
            Err(error) => self.report(&error)?,
        }

        Ok(())
    }

    fn search(&mut self) -> Result<Flow, MenuError> {
        let Some(needle) = self.prompt("Enter product name: ")? else {
            return Ok(Flow::Exit);
        };

        let found: Vec<String> = self
            .session
            .search_products(&needle)
            .map(|product| format!("Found: {} - {} {}", product.id, product.name, product.price))
            .collect();

        if found.is_empty() {
            writeln!(self.out, "No product matched.")?;
        }

        for line in found {
            writeln!(self.out, "{line}")?;
        }

        Ok(Flow::Continue)
    }

    /// Reads a product id then a quantity. `None` means input closed.
    fn read_line_change(
        &mut self,
        quantity_label: &str,
    ) -> Result<Option<(ProductId, u32)>, MenuError> {
        let id = loop {
            match self.read_number::<u32>("Enter product ID: ")? {
                Answer::Value(id) => break ProductId::new(id),
                Answer::Invalid => writeln!(self.out, "Invalid number.")?,
                Answer::Closed => return Ok(None),
            }
        };

        loop {
            match self.read_number::<u32>(quantity_label)? {
                Answer::Value(quantity) => return Ok(Some((id, quantity))),
                Answer::Invalid => writeln!(self.out, "Invalid number.")?,
                Answer::Closed => return Ok(None),
            }
        }
    }

    fn read_number<T: FromStr>(&mut self, label: &str) -> Result<Answer<T>, MenuError> {
        let Some(line) = self.prompt(label)? else {
            return Ok(Answer::Closed);
        };

        Ok(line.parse().map_or(Answer::Invalid, Answer::Value))
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>, MenuError> {
        write!(self.out, "{label}")?;
        self.out.flush()?;

        let mut line = String::new();

        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;

            return Ok(None);
        }

        Ok(Some(line.trim().to_string()))
    }

    fn report(&mut self, error: &SessionError) -> Result<(), MenuError> {
        match error {
            SessionError::ProductNotFound(_) => writeln!(self.out, "Product not found!")?,
            SessionError::ItemNotFound(_) => writeln!(self.out, "Item not found.")?,
            SessionError::InvalidQuantity => writeln!(self.out, "Quantity must be at least 1.")?,
            SessionError::NothingToUndo => writeln!(self.out, "Nothing to undo.")?,
            SessionError::EmptyCart => writeln!(self.out, "Cart empty!")?,
            SessionError::QueueEmpty => writeln!(self.out, "No orders in queue.")?,
            other => writeln!(self.out, "Error: {other}")?,
        }

        Ok(())
    }

    fn write_menu(&mut self) -> Result<(), MenuError> {
        writeln!(self.out, "\n===== EMPORIUM MENU =====")?;

        for action in Action::ALL {
            writeln!(self.out, "{}. {action}", action.number())?;
        }

        Ok(())
    }
}

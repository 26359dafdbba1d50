//! Undo

use clap::ValueEnum;

use crate::{cart::Cart, products::Product};

/// A stored instruction that reverses exactly one earlier cart mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoRecord {
    /// Reverses an add of `quantity_added` units.
    AddReversal {
        /// Product that was added
        product: Product,

        /// Units added by the reversed action
        quantity_added: u32,
    },

    /// Restores the quantity an entry had before it was changed.
    SetReversal {
        /// Product whose quantity was changed
        product: Product,

        /// Quantity before the change
        previous_quantity: u32,
    },
}

impl UndoRecord {
    /// The product this record refers to.
    pub fn product(&self) -> &Product {
        match self {
            UndoRecord::AddReversal { product, .. } | UndoRecord::SetReversal { product, .. } => {
                product
            }
        }
    }
}

/// How an [`UndoRecord::AddReversal`] is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AddReversalMode {
    /// Delete the whole cart line, whatever its current quantity.
    #[default]
    RemoveLine,

    /// Subtract the added units, removing the line once it reaches zero.
    Decrement,
}

/// Stack of reversible cart mutations, most recent on top.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
    mode: AddReversalMode,
}

impl UndoLog {
    /// Create an empty log using the default [`AddReversalMode`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty log that applies add reversals with `mode`.
    pub fn with_mode(mode: AddReversalMode) -> Self {
        Self {
            records: Vec::new(),
            mode,
        }
    }

    /// Record that `quantity` units of `product` were just added.
    pub fn record_add(&mut self, product: Product, quantity: u32) {
        self.records.push(UndoRecord::AddReversal {
            product,
            quantity_added: quantity,
        });
    }

    /// Record that the quantity of `product` was just changed from `previous_quantity`.
    pub fn record_set(&mut self, product: Product, previous_quantity: u32) {
        self.records.push(UndoRecord::SetReversal {
            product,
            previous_quantity,
        });
    }

    /// Pop the most recent record and apply it to `cart`.
    ///
    /// Returns `None` when there is nothing to undo. A set reversal whose product is no
    /// longer in the cart is still consumed; applying it is a no-op.
    pub fn undo_last(&mut self, cart: &mut Cart) -> Option<UndoRecord> {
        let record = self.records.pop()?;

        match &record {
            UndoRecord::AddReversal {
                product,
                quantity_added,
            } => match self.mode {
                AddReversalMode::RemoveLine => {
                    cart.remove_by_id(product.id);
                }
                AddReversalMode::Decrement => {
                    let remaining = cart.quantity_of(product.id).saturating_sub(*quantity_added);

                    cart.set_quantity(product.id, remaining);
                }
            },
            UndoRecord::SetReversal {
                product,
                previous_quantity,
            } => {
                cart.set_quantity(product.id, *previous_quantity);
            }
        }

        Some(record)
    }

    /// The record `undo_last` would apply next.
    pub fn peek(&self) -> Option<&UndoRecord> {
        self.records.last()
    }

    /// Discard every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The mode used for add reversals.
    pub fn mode(&self) -> AddReversalMode {
        self.mode
    }
}

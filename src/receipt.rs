//! Receipts
//!
//! Table renderings of the catalog, the cart, checkout quotes and the order history.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartEntry},
    catalog::Catalog,
    categories::CategoryDiscountTable,
    checkout::Quote,
    orders::{Order, OrderSink},
    prices::{PriceError, percent_points, price_times},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Writing to the output failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Price(#[from] PriceError),
}

/// Write the catalog with each product's category discount.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the output cannot be written.
pub fn write_catalog(
    mut out: impl io::Write,
    catalog: &Catalog,
    categories: &CategoryDiscountTable,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Product", "Category", "Price", "Category Discount"]);

    for product in catalog.iter() {
        let discount = categories
            .get(&product.category)
            .map(|percent| format!("{}%", percent_points(percent)))
            .unwrap_or_default();

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category.clone(),
            product.price.to_string(),
            discount,
        ]);
    }

    write_table(&mut out, builder, 3)
}

/// Write the cart contents.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the output cannot be written or a line price overflows.
pub fn write_cart(mut out: impl io::Write, cart: &Cart) -> Result<(), ReceiptError> {
    if cart.is_empty() {
        writeln!(out, "Cart is empty.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Item", "Qty", "Unit Price", "Line Price"]);

    for entry in cart.iter() {
        let product = entry.product();

        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            entry.quantity().to_string(),
            product.price.to_string(),
            price_times(&product.price, entry.quantity())?.to_string(),
        ]);
    }

    write_table(&mut out, builder, 2)
}

/// Write a quote line by line, followed by its totals.
///
/// `entries` must be the snapshot the quote was priced from.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the output cannot be written.
pub fn write_quote(
    mut out: impl io::Write,
    entries: &[CartEntry],
    quote: &Quote,
) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record([
        "Item",
        "Qty",
        "Free",
        "Base Price",
        "Bulk Discount",
        "Line Total",
    ]);

    for (entry, line) in entries.iter().zip(quote.lines()) {
        let bulk = if line.bulk_discount.to_minor_units() == 0 {
            String::new()
        } else {
            format!("-{}", line.bulk_discount)
        };

        let free = if line.free_units() == 0 {
            String::new()
        } else {
            line.free_units().to_string()
        };

        builder.push_record([
            entry.product().name.clone(),
            line.quantity.to_string(),
            free,
            line.base_price.to_string(),
            bulk,
            line.total.to_string(),
        ]);
    }

    write_table(&mut out, builder, 1)?;

    let delivery = if quote.free_delivery() {
        "FREE".to_string()
    } else {
        quote.delivery_charge().to_string()
    };

    let mut summary = vec![("Subtotal:", quote.subtotal().to_string())];

    if quote.large_order_discount().to_minor_units() != 0 {
        summary.push((
            "Large order discount:",
            format!("-{}", quote.large_order_discount()),
        ));
    }

    summary.push(("Delivery:", delivery));
    summary.push(("Total:", quote.total().to_string()));
    summary.push(("Savings:", quote.savings()?.to_string()));

    write_summary(&mut out, &summary)
}

/// Write a single order.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the output cannot be written.
pub fn write_order(mut out: impl io::Write, order: &Order) -> Result<(), ReceiptError> {
    writeln!(out, "Order {}", order.id())?;

    write_quote(&mut out, order.entries(), order.quote())
}

/// Write every recorded order, oldest first.
///
/// # Errors
///
/// Returns a [`ReceiptError`] if the output cannot be written.
pub fn write_history(mut out: impl io::Write, orders: &OrderSink) -> Result<(), ReceiptError> {
    if orders.history().is_empty() {
        writeln!(out, "No past orders.")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["Order", "Items", "Total", "Status"]);

    let queued: Vec<_> = orders.queued().map(Order::id).collect();

    for order in orders.history() {
        let items = order
            .entries()
            .iter()
            .map(|entry| format!("{} x{}", entry.product().name, entry.quantity()))
            .collect::<Vec<_>>()
            .join("\n");

        let status = if queued.contains(&order.id()) {
            "queued"
        } else {
            "processed"
        };

        builder.push_record([
            order.id().to_string(),
            items,
            order.total().to_string(),
            status.to_string(),
        ]);
    }

    write_table(&mut out, builder, 2)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    first_money_column: usize,
) -> Result<(), ReceiptError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(first_money_column..), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Writes right-aligned `label value` pairs with a shared value column.
fn write_summary(
    out: &mut impl io::Write,
    lines: &[(&str, String)],
) -> Result<(), ReceiptError> {
    let label_width = lines.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = lines.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in lines {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
    }

    Ok(())
}

//! Emporium
//!
//! Emporium is an in-memory retail ordering simulator: a product catalog, a shopping cart with
//! an undo history, a checkout engine applying layered discounts and delivery charges, and a
//! first-in first-out queue of placed orders.

pub mod cart;
pub mod catalog;
pub mod categories;
pub mod checkout;
pub mod config;
pub mod delivery;
pub mod fixtures;
pub mod menu;
pub mod orders;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod receipt;
pub mod session;
pub mod undo;

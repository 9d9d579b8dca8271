//! Domain models for the storefront.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod session;

pub use cart::Cart;
pub use catalog::Product;
pub use order::{Customer, Order, OrderLine};
pub use session::{CurrentUser, Flash, FlashLevel, keys as session_keys};

//! Domain models.
//!
//! These mirror the JSON documents on disk: field names are camelCase on the
//! wire, monetary values are decimal numbers, timestamps are RFC 3339.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::{Cart, CartItem, CartMap, DELIVERY_FEE};
pub use catalog::{Brand, Offer, Product, Promotion, Store};
pub use order::{Order, OrderItem};
pub use user::{Address, Favorites, Notification, PublicUser, User};

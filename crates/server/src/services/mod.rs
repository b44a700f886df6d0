//! Application services sitting between the routes and the repositories.

pub mod auth;
pub mod cart;
pub mod orders;

pub use auth::{AuthError, AuthService, TokenService};
pub use cart::{CartError, CartService};
pub use orders::{OrderError, OrderService};

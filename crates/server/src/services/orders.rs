//! Order service: checkout and order lifecycle.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use greenbasket_core::{OrderId, OrderStatus, UserId};

use crate::db::{RepositoryError, Storage, carts::CartRepository, orders::OrderRepository};
use crate::models::{Cart, Order};
use crate::models::user::Address;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout attempted with no items in the cart.
    #[error("cart is empty")]
    EmptyCart,

    /// No such order for this user.
    #[error("order not found")]
    NotFound,

    /// The requested status change is not allowed from the current status.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// The order has already reached a terminal status.
    #[error("cannot cancel this order")]
    CannotCancel,

    /// Storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    carts: CartRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self {
            orders: OrderRepository::new(storage),
            carts: CartRepository::new(storage),
        }
    }

    /// The user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` on storage failure.
    pub fn list(&self, user_id: &UserId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.orders.for_user(user_id)?;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    /// Look up one of the user's orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if no such order belongs to the user.
    pub fn get(&self, order_id: &OrderId, user_id: &UserId) -> Result<Order, OrderError> {
        self.orders.get(order_id, user_id)?.ok_or(OrderError::NotFound)
    }

    /// Turn the user's cart into an order.
    ///
    /// The order snapshots the cart verbatim, and the order insert plus the
    /// cart clear are persisted as one batch. A failed checkout leaves both
    /// documents untouched.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` when there is nothing to check out.
    #[instrument(skip(self, delivery_address, payment_method))]
    pub fn checkout(
        &self,
        user_id: &UserId,
        delivery_address: Option<Address>,
        payment_method: Option<String>,
    ) -> Result<Order, OrderError> {
        let cart = self.carts.get(user_id)?.unwrap_or_else(Cart::empty);
        if cart.items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order = Order::from_cart(user_id.clone(), &cart, delivery_address, payment_method);
        self.orders
            .insert_with_cart_clear(order.clone(), Cart::empty())?;
        tracing::info!(user_id = %user_id, order_id = %order.id, total = %order.total, "order placed");
        Ok(order)
    }

    /// Advance an order along the fulfilment lifecycle.
    ///
    /// Reaching `Delivered` stamps `actual_delivery`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::InvalidTransition` when the move is not in the
    /// lifecycle table and `OrderError::NotFound` for an unknown order.
    #[instrument(skip(self))]
    pub fn update_status(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let current = self.get(order_id, user_id)?;
        if !current.status.can_transition_to(status) {
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let updated = self.orders.update(order_id, user_id, |order| {
            order.status = status;
            if status == OrderStatus::Delivered {
                order.actual_delivery = Some(Utc::now());
            }
        })?;
        tracing::info!(order_id = %order_id, status = %status, "order status updated");
        Ok(updated)
    }

    /// Cancel an order that has not yet reached a terminal status.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::CannotCancel` for delivered or already cancelled
    /// orders.
    #[instrument(skip(self))]
    pub fn cancel(&self, order_id: &OrderId, user_id: &UserId) -> Result<Order, OrderError> {
        let current = self.get(order_id, user_id)?;
        if current.status.is_terminal() {
            return Err(OrderError::CannotCancel);
        }

        let updated = self.orders.update(order_id, user_id, |order| {
            order.status = OrderStatus::Cancelled;
        })?;
        tracing::info!(order_id = %order_id, "order cancelled");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Collection, MemoryStorage, store};
    use crate::models::Product;
    use crate::services::cart::CartService;
    use rust_decimal::Decimal;

    fn seeded_storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        let products: Vec<Product> = serde_json::from_value(serde_json::json!([
            {"id": "prod1", "name": "Milk", "currentPrice": 5.5},
        ]))
        .expect("valid products");
        store(&storage, Collection::Products, &products).expect("seed");
        storage
    }

    fn fill_cart(storage: &MemoryStorage, user: &UserId) {
        CartService::new(storage)
            .add_item(user, &greenbasket_core::ProductId::new("prod1"), 2)
            .expect("add");
    }

    #[test]
    fn test_checkout_snapshots_and_clears_cart() {
        let storage = seeded_storage();
        let user = UserId::new("user001");
        fill_cart(&storage, &user);

        let service = OrderService::new(&storage);
        let order = service.checkout(&user, None, None).expect("checkout");

        assert_eq!(order.subtotal, Decimal::new(1100, 2));
        assert_eq!(order.total, Decimal::new(1200, 2));
        assert_eq!(order.status, OrderStatus::Pending);

        let cart = CartService::new(&storage).get(&user).expect("get cart");
        assert!(cart.items.is_empty());

        let listed = service.list(&user).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, order.id);
    }

    #[test]
    fn test_empty_cart_checkout_persists_nothing() {
        let storage = seeded_storage();
        let user = UserId::new("user001");
        let service = OrderService::new(&storage);

        assert!(matches!(
            service.checkout(&user, None, None),
            Err(OrderError::EmptyCart)
        ));
        assert!(service.list(&user).expect("list").is_empty());
    }

    #[test]
    fn test_list_is_newest_first_and_owner_scoped() {
        let storage = seeded_storage();
        let alice = UserId::new("user001");
        let bob = UserId::new("user002");

        fill_cart(&storage, &alice);
        let service = OrderService::new(&storage);
        let first = service.checkout(&alice, None, None).expect("checkout");
        fill_cart(&storage, &alice);
        let second = service.checkout(&alice, None, None).expect("checkout");

        let listed = service.list(&alice).expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed[0].order_date >= listed[1].order_date);
        assert_eq!(listed[1].id, first.id);

        assert!(service.list(&bob).expect("list").is_empty());
        assert!(matches!(
            service.get(&second.id, &bob),
            Err(OrderError::NotFound)
        ));
    }

    #[test]
    fn test_status_lifecycle() {
        let storage = seeded_storage();
        let user = UserId::new("user001");
        fill_cart(&storage, &user);
        let service = OrderService::new(&storage);
        let order = service.checkout(&user, None, None).expect("checkout");

        // Skipping a stage is rejected.
        assert!(matches!(
            service.update_status(&order.id, &user, OrderStatus::Delivered),
            Err(OrderError::InvalidTransition { .. })
        ));

        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            let updated = service
                .update_status(&order.id, &user, status)
                .expect("advance");
            assert_eq!(updated.status, status);
        }

        let delivered = service.get(&order.id, &user).expect("get");
        assert!(delivered.actual_delivery.is_some());

        // Terminal orders accept no further moves.
        assert!(matches!(
            service.update_status(&order.id, &user, OrderStatus::Pending),
            Err(OrderError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_cancel_rules() {
        let storage = seeded_storage();
        let user = UserId::new("user001");
        fill_cart(&storage, &user);
        let service = OrderService::new(&storage);
        let order = service.checkout(&user, None, None).expect("checkout");

        let cancelled = service.cancel(&order.id, &user).expect("cancel");
        assert_eq!(cancelled.status, OrderStatus::Cancelled);

        // Cancelling twice, or after delivery, is rejected.
        assert!(matches!(
            service.cancel(&order.id, &user),
            Err(OrderError::CannotCancel)
        ));

        fill_cart(&storage, &user);
        let order = service.checkout(&user, None, None).expect("checkout");
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            service
                .update_status(&order.id, &user, status)
                .expect("advance");
        }
        assert!(matches!(
            service.cancel(&order.id, &user),
            Err(OrderError::CannotCancel)
        ));
    }
}

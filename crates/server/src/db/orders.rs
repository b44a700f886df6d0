//! Order repository over the `orders` collection.

use greenbasket_core::{OrderId, UserId};

use super::{Collection, RepositoryError, Storage};
use crate::models::{Cart, CartMap, Order};

/// Repository for orders.
pub struct OrderRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Load the whole orders collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn all(&self) -> Result<Vec<Order>, RepositoryError> {
        super::load(self.storage, Collection::Orders)
    }

    /// All orders belonging to a user, in stored order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn for_user(&self, user_id: &UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|o| &o.user_id == user_id)
            .collect())
    }

    /// Look up an order by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn get(&self, id: &OrderId, user_id: &UserId) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .find(|o| &o.id == id && &o.user_id == user_id))
    }

    /// Persist a new order and the user's cleared cart as one batch.
    ///
    /// This is the checkout unit of work: both documents go through
    /// [`Storage::write_all`] so a backend that can apply batches atomically
    /// (the in-memory store does) never exposes an order without the cart
    /// clear, or vice versa.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or write failure.
    pub fn insert_with_cart_clear(
        &self,
        order: Order,
        cleared_cart: Cart,
    ) -> Result<(), RepositoryError> {
        let mut orders = self.all()?;
        let user_id = order.user_id.clone();
        orders.push(order);

        let mut carts: CartMap = super::load(self.storage, Collection::Cart)?;
        carts.insert(user_id, cleared_cart);

        self.storage.write_all(vec![
            (Collection::Orders, super::to_document(&orders)?),
            (Collection::Cart, super::to_document(&carts)?),
        ])
    }

    /// Mutate an order in place and persist the collection. Scoped to the
    /// owning user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order belongs to the
    /// user.
    pub fn update(
        &self,
        id: &OrderId,
        user_id: &UserId,
        mutate: impl FnOnce(&mut Order),
    ) -> Result<Order, RepositoryError> {
        let mut orders = self.all()?;
        let order = orders
            .iter_mut()
            .find(|o| &o.id == id && &o.user_id == user_id)
            .ok_or(RepositoryError::NotFound)?;

        mutate(order);
        let updated = order.clone();

        super::store(self.storage, Collection::Orders, &orders)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use crate::db::carts::CartRepository;
    use crate::models::catalog::Product;

    fn cart_with_one_item() -> Cart {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "prod1",
            "name": "Milk",
            "currentPrice": 5.5,
        }))
        .expect("valid product");
        let mut cart = Cart::empty();
        cart.add_product(&product, 2);
        cart
    }

    #[test]
    fn test_insert_with_cart_clear_commits_both() {
        let storage = MemoryStorage::new();
        let carts = CartRepository::new(&storage);
        let orders = OrderRepository::new(&storage);
        let user = UserId::new("user001");

        let cart = cart_with_one_item();
        carts.put(&user, cart.clone()).expect("put cart");

        let order = Order::from_cart(user.clone(), &cart, None, None);
        let order_id = order.id.clone();
        orders
            .insert_with_cart_clear(order, Cart::empty())
            .expect("checkout");

        assert!(orders.get(&order_id, &user).expect("get").is_some());
        let stored_cart = carts.get(&user).expect("get").expect("present");
        assert!(stored_cart.items.is_empty());
    }

    #[test]
    fn test_get_is_scoped_to_owner() {
        let storage = MemoryStorage::new();
        let orders = OrderRepository::new(&storage);
        let owner = UserId::new("user001");

        let cart = cart_with_one_item();
        let order = Order::from_cart(owner.clone(), &cart, None, None);
        let order_id = order.id.clone();
        orders
            .insert_with_cart_clear(order, Cart::empty())
            .expect("checkout");

        assert!(orders.get(&order_id, &owner).expect("get").is_some());
        assert!(
            orders
                .get(&order_id, &UserId::new("user002"))
                .expect("get")
                .is_none()
        );
    }

    #[test]
    fn test_update_scoped_not_found() {
        let storage = MemoryStorage::new();
        let orders = OrderRepository::new(&storage);
        let result = orders.update(&OrderId::new("nope"), &UserId::new("user001"), |_| {});
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}

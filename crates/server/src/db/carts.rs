//! Cart repository over the `cart` collection (a map of user id to cart).

use greenbasket_core::UserId;

use super::{Collection, RepositoryError, Storage};
use crate::models::{Cart, CartMap};

/// Repository for per-user carts.
pub struct CartRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Load the whole cart map.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn map(&self) -> Result<CartMap, RepositoryError> {
        super::load(self.storage, Collection::Cart)
    }

    /// The user's stored cart, if any mutation ever persisted one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn get(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self.map()?.remove(user_id))
    }

    /// Replace the user's cart and persist the map.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or write failure.
    pub fn put(&self, user_id: &UserId, cart: Cart) -> Result<(), RepositoryError> {
        let mut map = self.map()?;
        map.insert(user_id.clone(), cart);
        super::store(self.storage, Collection::Cart, &map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;

    #[test]
    fn test_missing_cart_is_none() {
        let storage = MemoryStorage::new();
        let repo = CartRepository::new(&storage);
        assert!(repo.get(&UserId::new("user001")).expect("get").is_none());
    }

    #[test]
    fn test_put_then_get() {
        let storage = MemoryStorage::new();
        let repo = CartRepository::new(&storage);
        let user = UserId::new("user001");

        repo.put(&user, Cart::empty()).expect("put");
        let cart = repo.get(&user).expect("get").expect("present");
        assert!(cart.items.is_empty());

        // Other users remain untouched.
        assert!(repo.get(&UserId::new("user002")).expect("get").is_none());
    }
}

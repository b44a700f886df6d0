//! Cart service: per-user cart state and item operations.

use thiserror::Error;
use tracing::instrument;

use greenbasket_core::{CartItemId, ProductId, UserId};

use crate::db::{RepositoryError, Storage, carts::CartRepository, catalog::CatalogRepository};
use crate::models::Cart;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No product with the given id exists in the catalog.
    #[error("product not found")]
    ProductNotFound,

    /// The product exists but is flagged out of stock.
    #[error("product is out of stock")]
    OutOfStock,

    /// Quantity must be at least 1.
    #[error("invalid quantity")]
    InvalidQuantity,

    /// The user has no stored cart.
    #[error("cart not found")]
    CartNotFound,

    /// No cart line with the given item id.
    #[error("cart item not found")]
    ItemNotFound,

    /// Storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    catalog: CatalogRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self {
            carts: CartRepository::new(storage),
            catalog: CatalogRepository::new(storage),
        }
    }

    /// The user's cart, or a fresh empty one if none is stored.
    ///
    /// A fresh cart is not persisted until the first mutation.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    pub fn get(&self, user_id: &UserId) -> Result<Cart, CartError> {
        Ok(self.carts.get(user_id)?.unwrap_or_else(Cart::empty))
    }

    /// Add a product to the cart, merging into an existing line for the same
    /// product. The line keeps the unit price it was first added at.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity`, `CartError::ProductNotFound`, or
    /// `CartError::OutOfStock` before touching the stored cart.
    #[instrument(skip(self))]
    pub fn add_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let product = self
            .catalog
            .product(product_id)?
            .ok_or(CartError::ProductNotFound)?;
        if !product.in_stock {
            return Err(CartError::OutOfStock);
        }

        let mut cart = self.get(user_id)?;
        cart.add_product(&product, quantity);
        self.carts.put(user_id, cart.clone())?;
        tracing::debug!(user_id = %user_id, product_id = %product_id, quantity, "cart item added");
        Ok(cart)
    }

    /// Set the quantity on an existing cart line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no stored cart and
    /// `CartError::ItemNotFound` if the line does not exist.
    #[instrument(skip(self))]
    pub fn update_item(
        &self,
        user_id: &UserId,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        let mut cart = self.carts.get(user_id)?.ok_or(CartError::CartNotFound)?;
        if !cart.update_item(item_id, quantity) {
            return Err(CartError::ItemNotFound);
        }
        self.carts.put(user_id, cart.clone())?;
        Ok(cart)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no stored cart and
    /// `CartError::ItemNotFound` if the line does not exist.
    #[instrument(skip(self))]
    pub fn remove_item(&self, user_id: &UserId, item_id: &CartItemId) -> Result<Cart, CartError> {
        let mut cart = self.carts.get(user_id)?.ok_or(CartError::CartNotFound)?;
        if !cart.remove_item(item_id) {
            return Err(CartError::ItemNotFound);
        }
        self.carts.put(user_id, cart.clone())?;
        Ok(cart)
    }

    /// Replace the user's cart with an empty one. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` on storage failure.
    #[instrument(skip(self))]
    pub fn clear(&self, user_id: &UserId) -> Result<Cart, CartError> {
        let cart = Cart::empty();
        self.carts.put(user_id, cart.clone())?;
        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Collection, MemoryStorage, store};
    use crate::models::{DELIVERY_FEE, Product};
    use rust_decimal::Decimal;

    fn seed_catalog(storage: &MemoryStorage) {
        let products: Vec<Product> = serde_json::from_value(serde_json::json!([
            {"id": "prod1", "name": "Milk", "currentPrice": 5.5},
            {"id": "prod2", "name": "Bread", "currentPrice": 2.25},
            {"id": "prod3", "name": "Eggs", "currentPrice": 3.0, "inStock": false},
        ]))
        .expect("valid products");
        store(storage, Collection::Products, &products).expect("seed");
    }

    #[test]
    fn test_get_defaults_to_empty_cart() {
        let storage = MemoryStorage::new();
        let service = CartService::new(&storage);
        let user = UserId::new("user001");

        let cart = service.get(&user).expect("get");
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, DELIVERY_FEE);
        // Reading a fresh cart must not persist it.
        assert!(
            CartRepository::new(&storage)
                .get(&user)
                .expect("get")
                .is_none()
        );
    }

    #[test]
    fn test_add_item_snapshots_and_totals() {
        let storage = MemoryStorage::new();
        seed_catalog(&storage);
        let service = CartService::new(&storage);
        let user = UserId::new("user001");

        let cart = service
            .add_item(&user, &ProductId::new("prod1"), 2)
            .expect("add");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.subtotal, Decimal::new(1100, 2));
        assert_eq!(cart.total, Decimal::new(1200, 2));

        // Same product merges into the existing line.
        let cart = service
            .add_item(&user, &ProductId::new("prod1"), 1)
            .expect("add");
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);

        // Mutations persist.
        let stored = service.get(&user).expect("get");
        assert_eq!(stored.items[0].quantity, 3);
    }

    #[test]
    fn test_add_item_validation() {
        let storage = MemoryStorage::new();
        seed_catalog(&storage);
        let service = CartService::new(&storage);
        let user = UserId::new("user001");

        assert!(matches!(
            service.add_item(&user, &ProductId::new("prod1"), 0),
            Err(CartError::InvalidQuantity)
        ));
        assert!(matches!(
            service.add_item(&user, &ProductId::new("missing"), 1),
            Err(CartError::ProductNotFound)
        ));
        assert!(matches!(
            service.add_item(&user, &ProductId::new("prod3"), 1),
            Err(CartError::OutOfStock)
        ));
        // None of the failed adds may have created a cart.
        assert!(service.get(&user).expect("get").items.is_empty());
    }

    #[test]
    fn test_update_and_remove_item() {
        let storage = MemoryStorage::new();
        seed_catalog(&storage);
        let service = CartService::new(&storage);
        let user = UserId::new("user001");

        let cart = service
            .add_item(&user, &ProductId::new("prod1"), 1)
            .expect("add");
        let item_id = cart.items[0].id.clone();

        let cart = service.update_item(&user, &item_id, 4).expect("update");
        assert_eq!(cart.items[0].quantity, 4);
        assert_eq!(cart.subtotal, Decimal::new(2200, 2));

        assert!(matches!(
            service.update_item(&user, &item_id, 0),
            Err(CartError::InvalidQuantity)
        ));
        assert!(matches!(
            service.update_item(&user, &CartItemId::new("missing"), 2),
            Err(CartError::ItemNotFound)
        ));

        let cart = service.remove_item(&user, &item_id).expect("remove");
        assert!(cart.items.is_empty());
        assert_eq!(cart.total, DELIVERY_FEE);
        assert!(matches!(
            service.remove_item(&user, &item_id),
            Err(CartError::ItemNotFound)
        ));
    }

    #[test]
    fn test_update_without_stored_cart() {
        let storage = MemoryStorage::new();
        let service = CartService::new(&storage);
        assert!(matches!(
            service.update_item(&UserId::new("user001"), &CartItemId::new("x"), 2),
            Err(CartError::CartNotFound)
        ));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let storage = MemoryStorage::new();
        seed_catalog(&storage);
        let service = CartService::new(&storage);
        let user = UserId::new("user001");

        service
            .add_item(&user, &ProductId::new("prod1"), 2)
            .expect("add");
        let cart = service.clear(&user).expect("clear");
        assert!(cart.items.is_empty());

        let cart = service.clear(&user).expect("clear again");
        assert!(cart.items.is_empty());
    }
}

//! Cart state: per-user line items and monetary aggregates.
//!
//! The invariants that must hold after every mutation:
//!
//! - `item.totalPrice == item.quantity * item.unitPrice`
//! - `cart.subtotal == sum of item.totalPrice`
//! - `cart.total == cart.subtotal + cart.deliveryFee`
//!
//! Aggregates are always recomputed from item state, never adjusted
//! incrementally, so they cannot drift.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greenbasket_core::{CartItemId, Currency, UserId};

use super::catalog::Product;

/// Flat delivery fee applied to every cart (1.00 KD).
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(100, 0, 0, false, 2);

/// The cart collection document: user id to cart.
pub type CartMap = HashMap<UserId, Cart>;

/// A cart line item, snapshotting product data at add time.
///
/// `unit_price` is the product price when the item was first added; merging
/// additional quantity of the same product keeps that snapshot rather than
/// re-fetching the current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: greenbasket_core::ProductId,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image: Option<String>,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Snapshot a product into a new line item.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        let unit_price = product.current_price;
        Self {
            id: CartItemId::generate(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_image: product.image_url.clone(),
            quantity,
            unit_price,
            total_price: unit_price * Decimal::from(quantity),
            currency: product.currency,
            added_at: Utc::now(),
        }
    }

    /// Recompute `total_price` from the snapshot unit price.
    pub fn recompute_total(&mut self) {
        self.total_price = self.unit_price * Decimal::from(self.quantity);
    }
}

/// A per-user cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub last_updated: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::empty()
    }
}

impl Cart {
    /// The empty default cart a user starts with.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: Decimal::ZERO,
            delivery_fee: DELIVERY_FEE,
            total: DELIVERY_FEE,
            currency: Currency::Kd,
            last_updated: Utc::now(),
        }
    }

    /// Add quantity of a product.
    ///
    /// If the product is already in the cart its quantity is incremented and
    /// the line total recomputed from the existing unit-price snapshot;
    /// otherwise a new snapshot item is appended at the product's current
    /// price. Merged quantities saturate at `u32::MAX`. Aggregates are
    /// recomputed either way.
    pub fn add_product(&mut self, product: &Product, quantity: u32) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id)
        {
            item.quantity = item.quantity.saturating_add(quantity);
            item.recompute_total();
        } else {
            self.items.push(CartItem::snapshot(product, quantity));
        }
        self.recalculate();
    }

    /// Set the quantity of an existing item. Returns `false` if the item id
    /// is not in the cart.
    pub fn update_item(&mut self, item_id: &CartItemId, quantity: u32) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.id == item_id) else {
            return false;
        };
        item.quantity = quantity;
        item.recompute_total();
        self.recalculate();
        true
    }

    /// Remove an item. Returns `false` if the item id is not in the cart.
    pub fn remove_item(&mut self, item_id: &CartItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != item_id);
        if self.items.len() == before {
            return false;
        }
        self.recalculate();
        true
    }

    /// Recompute aggregates from item state and stamp `last_updated`.
    pub fn recalculate(&mut self) {
        self.subtotal = self.items.iter().map(|item| item.total_price).sum();
        self.total = self.subtotal + self.delivery_fee;
        self.last_updated = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenbasket_core::ProductId;

    fn product(id: &str, price: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Product {id}"),
            "currentPrice": price,
        }))
        .expect("valid product")
    }

    fn assert_invariants(cart: &Cart) {
        for item in &cart.items {
            assert_eq!(item.total_price, item.unit_price * Decimal::from(item.quantity));
        }
        let expected: Decimal = cart.items.iter().map(|i| i.total_price).sum();
        assert_eq!(cart.subtotal, expected);
        assert_eq!(cart.total, cart.subtotal + cart.delivery_fee);
    }

    #[test]
    fn test_worked_example() {
        // prod1 at 5.50 KD, quantity 2 -> line 11.00, subtotal 11.00, total 12.00
        let mut cart = Cart::empty();
        cart.add_product(&product("prod1", 5.50), 2);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].total_price, Decimal::new(1100, 2));
        assert_eq!(cart.subtotal, Decimal::new(1100, 2));
        assert_eq!(cart.total, Decimal::new(1200, 2));
        assert_invariants(&cart);
    }

    #[test]
    fn test_adding_same_product_merges_at_first_price() {
        let mut cart = Cart::empty();
        let first = product("prod1", 5.50);
        cart.add_product(&first, 2);

        // Price changed upstream; the snapshot must win.
        let repriced = product("prod1", 9.99);
        cart.add_product(&repriced, 3);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].unit_price, Decimal::new(550, 2));
        assert_eq!(cart.items[0].total_price, Decimal::new(2750, 2));
        assert_invariants(&cart);
    }

    #[test]
    fn test_merging_quantity_saturates_instead_of_overflowing() {
        let mut cart = Cart::empty();
        let item = product("prod1", 0.25);
        cart.add_product(&item, u32::MAX);
        cart.add_product(&item, 2);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, u32::MAX);
        assert_invariants(&cart);
    }

    #[test]
    fn test_update_quantity_recomputes() {
        let mut cart = Cart::empty();
        cart.add_product(&product("prod1", 2.00), 1);
        let item_id = cart.items[0].id.clone();

        assert!(cart.update_item(&item_id, 4));
        assert_eq!(cart.items[0].total_price, Decimal::new(800, 2));
        assert_invariants(&cart);

        assert!(!cart.update_item(&CartItemId::new("missing"), 1));
    }

    #[test]
    fn test_removing_last_item_leaves_delivery_fee_total() {
        let mut cart = Cart::empty();
        cart.add_product(&product("prod1", 5.50), 2);
        let item_id = cart.items[0].id.clone();

        assert!(cart.remove_item(&item_id));
        assert!(cart.items.is_empty());
        assert_eq!(cart.subtotal, Decimal::ZERO);
        assert_eq!(cart.total, DELIVERY_FEE);
        assert_invariants(&cart);

        assert!(!cart.remove_item(&item_id));
    }

    #[test]
    fn test_invariants_across_mutation_sequence() {
        let mut cart = Cart::empty();
        let a = product("prodA", 1.25);
        let b = product("prodB", 0.75);

        cart.add_product(&a, 3);
        assert_invariants(&cart);
        cart.add_product(&b, 1);
        assert_invariants(&cart);
        cart.add_product(&a, 2);
        assert_invariants(&cart);

        let b_id = cart
            .items
            .iter()
            .find(|i| i.product_id == ProductId::new("prodB"))
            .expect("item b")
            .id
            .clone();
        cart.update_item(&b_id, 10);
        assert_invariants(&cart);
        cart.remove_item(&b_id);
        assert_invariants(&cart);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = Cart::empty();
        for id in ["prodC", "prodA", "prodB"] {
            cart.add_product(&product(id, 1.0), 1);
        }
        let order: Vec<_> = cart
            .items
            .iter()
            .map(|i| i.product_id.as_str().to_string())
            .collect();
        assert_eq!(order, ["prodC", "prodA", "prodB"]);
    }

    #[test]
    fn test_wire_format_uses_numbers() {
        let mut cart = Cart::empty();
        cart.add_product(&product("prod1", 5.50), 2);

        let json = serde_json::to_value(&cart).expect("serialize");
        assert_eq!(json["subtotal"], serde_json::json!(11.0));
        assert_eq!(json["deliveryFee"], serde_json::json!(1.0));
        assert_eq!(json["total"], serde_json::json!(12.0));
        assert_eq!(json["items"][0]["unitPrice"], serde_json::json!(5.5));
    }
}

//! Order state: an immutable point-in-time copy of a cart.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greenbasket_core::{Currency, OrderId, OrderStatus, PaymentStatus, ProductId, UserId};

use super::cart::Cart;
use super::user::Address;

/// Delivery estimate offset applied at checkout.
const ESTIMATED_DELIVERY_HOURS: i64 = 2;

/// Payment method recorded when the request does not name one.
const DEFAULT_PAYMENT_METHOD: &str = "Credit Card";

/// A line item copied out of the cart at checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

/// A placed order.
///
/// Item contents and totals are frozen at creation; only `status`,
/// `payment_status`, and `actual_delivery` change afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_number: String,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delivery_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub delivery_address: Option<Address>,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub tracking_number: String,
    pub estimated_delivery: DateTime<Utc>,
    pub actual_delivery: Option<DateTime<Utc>>,
}

impl Order {
    /// Materialize an order from a cart.
    ///
    /// Items and totals are copied verbatim - no recomputation - so the
    /// order is an exact snapshot of the cart at this moment.
    #[must_use]
    pub fn from_cart(
        user_id: UserId,
        cart: &Cart,
        delivery_address: Option<Address>,
        payment_method: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::generate(),
            user_id,
            order_number: format!("ORD-{}", now.timestamp_millis()),
            status: OrderStatus::Pending,
            order_date: now,
            delivery_date: None,
            items: cart
                .items
                .iter()
                .map(|item| OrderItem {
                    product_id: item.product_id.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                })
                .collect(),
            subtotal: cart.subtotal,
            delivery_fee: cart.delivery_fee,
            total: cart.total,
            currency: cart.currency,
            delivery_address,
            payment_method: payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            payment_status: PaymentStatus::Pending,
            tracking_number: format!("TRK{}", now.timestamp_millis()),
            estimated_delivery: now + Duration::hours(ESTIMATED_DELIVERY_HOURS),
            actual_delivery: None,
        }
    }
}

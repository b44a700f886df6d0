//! User domain types: account, address, favorites, notifications.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greenbasket_core::{AddressId, Email, NotificationId, ProductId, StoreId, UserId};

/// Fallback profile image for accounts that never set one.
const DEFAULT_PROFILE_IMAGE: &str = "https://example.com/default_profile.jpg";

/// A registered user.
///
/// Owned by the users collection; the password hash is persisted but never
/// serialized into any response view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: String,
    pub address: Address,
    #[serde(default)]
    pub favorites: Favorites,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    /// Argon2 password hash. Legacy seed records predate password storage
    /// and have no hash; login falls back to the fixed demo password for
    /// those.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub wallet_balance: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a fresh account with an empty default address and no activity.
    #[must_use]
    pub fn new(name: String, email: Email, phone: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            name,
            email,
            phone,
            address: Address::empty(),
            favorites: Favorites::default(),
            notifications: Vec::new(),
            password_hash: Some(password_hash),
            profile_image: None,
            wallet_balance: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The public view returned from login/registration.
    #[must_use]
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }

    /// The full profile view: everything except credential material.
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            favorites: self.favorites.clone(),
            notifications: self.notifications.clone(),
            profile_image: self.profile_image.clone(),
            wallet_balance: self.wallet_balance,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The condensed account view used by the customer-info endpoint.
    #[must_use]
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            profile_image: self
                .profile_image
                .clone()
                .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()),
            is_valid_for_discount: true,
            wallet_balance: self.wallet_balance.unwrap_or_default(),
        }
    }
}

/// A delivery address with coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub label: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub coordinates: Coordinates,
}

impl Address {
    /// The blank default address every new account starts with.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: AddressId::generate(),
            label: "Home".to_string(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            country: String::new(),
            coordinates: Coordinates::default(),
        }
    }
}

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Sets of favorited store and product ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Favorites {
    #[serde(default)]
    pub stores: Vec<StoreId>,
    #[serde(default)]
    pub products: Vec<ProductId>,
}

/// A stored notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(default = "default_notification_kind", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// The formatted view the client renders.
    #[must_use]
    pub fn view(&self) -> NotificationView {
        NotificationView {
            id: self.id.clone(),
            title: self.title.clone(),
            message: self.message.clone(),
            kind: self.kind.clone(),
            is_read: self.read,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

fn default_notification_kind() -> String {
    "general".to_string()
}

/// Public user view returned from login and registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: Address,
}

/// Full profile view (no credential material).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: Address,
    pub favorites: Favorites,
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub wallet_balance: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Condensed account view for the customer-info endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub profile_image: String,
    pub is_valid_for_discount: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub wallet_balance: Decimal,
}

/// Formatted notification view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for the address update endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpdate {
    pub label: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User::new(
            "John Doe".to_string(),
            Email::parse("john@example.com").expect("valid email"),
            "+96512345678".to_string(),
            "$argon2id$stub".to_string(),
        )
    }

    #[test]
    fn test_views_never_carry_password_hash() {
        let user = sample_user();

        let public = serde_json::to_value(user.public()).expect("serialize");
        let profile = serde_json::to_value(user.profile()).expect("serialize");
        let info = serde_json::to_value(user.info()).expect("serialize");

        for view in [public, profile, info] {
            assert!(view.get("passwordHash").is_none());
            assert!(view.get("password_hash").is_none());
        }
    }

    #[test]
    fn test_new_user_starts_empty() {
        let user = sample_user();
        assert!(user.favorites.stores.is_empty());
        assert!(user.favorites.products.is_empty());
        assert!(user.notifications.is_empty());
        assert_eq!(user.address.label, "Home");
        assert!(user.address.address_line1.is_empty());
    }

    #[test]
    fn test_legacy_record_without_hash_deserializes() {
        let raw = serde_json::json!({
            "id": "user001",
            "name": "John Doe",
            "email": "john@example.com",
            "phone": "+96512345678",
            "address": {
                "id": "addr001",
                "label": "Home",
                "addressLine1": "Block 4, Street 12",
                "city": "Kuwait City",
                "country": "Kuwait"
            },
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        });

        let user: User = serde_json::from_value(raw).expect("deserialize");
        assert!(user.password_hash.is_none());
        assert!(user.notifications.is_empty());
    }
}

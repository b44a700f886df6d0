//! Pure catalog query helpers: filtering, sorting, pagination.
//!
//! These operate on already-loaded collections so the route handlers stay
//! thin and the logic is testable without storage.

use crate::models::{Product, Store};

/// Product listing filters, all optional and combined with AND.
#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    /// Case-insensitive substring match over name, brand, category, and tags.
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub popular_only: bool,
    pub super_saver_only: bool,
    pub recommended_only: bool,
    pub discounted_only: bool,
    pub in_stock_only: bool,
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        if self.popular_only && !product.is_popular {
            return false;
        }
        if self.super_saver_only && !product.is_super_saver {
            return false;
        }
        if self.recommended_only && !product.is_recommended {
            return false;
        }
        if self.discounted_only && discount_value(product) <= 0.0 {
            return false;
        }
        if self.in_stock_only && !product.in_stock {
            return false;
        }
        if let Some(category) = &self.category
            && !product.category.eq_ignore_ascii_case(category)
        {
            return false;
        }
        if let Some(brand) = &self.brand
            && !product.brand.eq_ignore_ascii_case(brand)
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.brand.to_lowercase().contains(&needle)
                || product.category.to_lowercase().contains(&needle)
                || product
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Store listing filters.
#[derive(Debug, Default, Clone)]
pub struct StoreFilter {
    /// Case-insensitive substring match over name and type.
    pub search: Option<String>,
    pub store_type: Option<String>,
    pub open_only: bool,
}

impl StoreFilter {
    fn matches(&self, store: &Store) -> bool {
        if self.open_only && !store.is_open {
            return false;
        }
        if let Some(store_type) = &self.store_type
            && !store.store_type.eq_ignore_ascii_case(store_type)
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = store.name.to_lowercase().contains(&needle)
                || store.store_type.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Apply a product filter, preserving catalog order.
#[must_use]
pub fn filter_products(products: Vec<Product>, filter: &ProductFilter) -> Vec<Product> {
    products.into_iter().filter(|p| filter.matches(p)).collect()
}

/// Apply a store filter, preserving catalog order.
#[must_use]
pub fn filter_stores(stores: Vec<Store>, filter: &StoreFilter) -> Vec<Store> {
    stores.into_iter().filter(|s| filter.matches(s)).collect()
}

/// Sort products by rating, highest first. Missing ratings sort as 0;
/// ties break on review count, highest first.
pub fn sort_products_by_rating(products: &mut [Product]) {
    products.sort_by(|a, b| {
        b.rating
            .unwrap_or(0.0)
            .total_cmp(&a.rating.unwrap_or(0.0))
            .then_with(|| b.review_count.unwrap_or(0).cmp(&a.review_count.unwrap_or(0)))
    });
}

/// Sort products by discount percentage, highest first. Products without a
/// discount sort as 0.
pub fn sort_products_by_discount(products: &mut [Product]) {
    products.sort_by(|a, b| discount_value(b).total_cmp(&discount_value(a)));
}

/// Sort stores by rating, highest first. Ties break on the review count
/// display string, read as digits only (`"2K+"` reads as 2).
pub fn sort_stores_by_rating(stores: &mut [Store]) {
    stores.sort_by(|a, b| {
        b.rating
            .unwrap_or(0.0)
            .total_cmp(&a.rating.unwrap_or(0.0))
            .then_with(|| review_count_value(b).cmp(&review_count_value(a)))
    });
}

/// Sort stores by their best promotion discount, highest first.
pub fn sort_stores_by_max_discount(stores: &mut [Store]) {
    stores.sort_by(|a, b| b.max_discount().total_cmp(&a.max_discount()));
}

/// Sort stores by creation time, newest first. Stores without a timestamp
/// sort last.
pub fn sort_stores_by_created(stores: &mut [Store]) {
    stores.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Page through a collection. `offset` past the end yields an empty page.
#[must_use]
pub fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

fn discount_value(product: &Product) -> f64 {
    product.discount_percentage.unwrap_or(0.0)
}

fn review_count_value(store: &Store) -> u64 {
    store.review_count.as_deref().map_or(0, |raw| {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    })
}

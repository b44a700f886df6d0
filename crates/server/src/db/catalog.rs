//! Read-only access to the catalog collections.

use greenbasket_core::{BrandId, OfferId, ProductId, StoreId};

use super::{Collection, RepositoryError, Storage};
use crate::models::{Brand, Offer, Product, Store};

/// Repository for the read-only catalog collections.
pub struct CatalogRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Load all products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn products(&self) -> Result<Vec<Product>, RepositoryError> {
        super::load(self.storage, Collection::Products)
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn product(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.products()?.into_iter().find(|p| &p.id == id))
    }

    /// Load all stores.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn stores(&self) -> Result<Vec<Store>, RepositoryError> {
        super::load(self.storage, Collection::Stores)
    }

    /// Look up a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn store(&self, id: &StoreId) -> Result<Option<Store>, RepositoryError> {
        Ok(self.stores()?.into_iter().find(|s| &s.id == id))
    }

    /// Load all offers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn offers(&self) -> Result<Vec<Offer>, RepositoryError> {
        super::load(self.storage, Collection::Offers)
    }

    /// Look up an offer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn offer(&self, id: &OfferId) -> Result<Option<Offer>, RepositoryError> {
        Ok(self.offers()?.into_iter().find(|o| &o.id == id))
    }

    /// Load all brands.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn brands(&self) -> Result<Vec<Brand>, RepositoryError> {
        super::load(self.storage, Collection::Brands)
    }

    /// Look up a brand by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn brand(&self, id: &BrandId) -> Result<Option<Brand>, RepositoryError> {
        Ok(self.brands()?.into_iter().find(|b| &b.id == id))
    }
}

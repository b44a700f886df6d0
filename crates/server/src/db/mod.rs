//! Flat-file storage for the mock backend.
//!
//! Every named collection lives in a single JSON document
//! (`users.json`, `products.json`, ...). Reads and writes always operate on
//! the whole document; there is no partial update, no locking, and no
//! transaction log. Two writers racing on the same collection produce a
//! last-write-wins outcome. That is the storage contract the original data
//! files were written against, so the [`Storage`] trait preserves it while
//! letting tests inject an in-memory backend.
//!
//! ## Collections
//!
//! - `users` - accounts, addresses, favorites, notifications
//! - `stores`, `products`, `offers`, `brands` - catalog data
//! - `cart` - map of user id to cart
//! - `orders` - flat list of orders

pub mod carts;
pub mod catalog;
pub mod orders;
pub mod users;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// The named collections the backend persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Stores,
    Products,
    Offers,
    Brands,
    Cart,
    Orders,
}

impl Collection {
    /// File name of the backing JSON document.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Users => "users.json",
            Self::Stores => "stores.json",
            Self::Products => "products.json",
            Self::Offers => "offers.json",
            Self::Brands => "brands.json",
            Self::Cart => "cart.json",
            Self::Orders => "orders.json",
        }
    }
}

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying I/O or lock failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored document does not parse as the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Whole-document storage for named collections.
///
/// `read` returns `None` when the collection has never been written, which
/// callers treat as the collection's empty default. `write` replaces the
/// entire document.
pub trait Storage: Send + Sync {
    /// Read the whole document for a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` on I/O failure and
    /// `RepositoryError::DataCorruption` if the document is not valid JSON.
    fn read(&self, collection: Collection) -> Result<Option<Value>, RepositoryError>;

    /// Replace the whole document for a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` on I/O failure.
    fn write(&self, collection: Collection, document: Value) -> Result<(), RepositoryError>;

    /// Apply a batch of whole-document replacements.
    ///
    /// The default implementation writes sequentially, so a failure can leave
    /// earlier writes committed. Backends that can do better (the in-memory
    /// store applies the batch under one lock) should override this; the
    /// checkout path relies on it for its order-plus-cart write.
    ///
    /// # Errors
    ///
    /// Returns the first write error encountered.
    fn write_all(&self, batch: Vec<(Collection, Value)>) -> Result<(), RepositoryError> {
        for (collection, document) in batch {
            self.write(collection, document)?;
        }
        Ok(())
    }
}

/// Load a collection into its typed form, defaulting when absent.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the stored document does not
/// deserialize as `T`.
pub fn load<T>(storage: &dyn Storage, collection: Collection) -> Result<T, RepositoryError>
where
    T: DeserializeOwned + Default,
{
    match storage.read(collection)? {
        Some(document) => serde_json::from_value(document).map_err(|e| {
            RepositoryError::DataCorruption(format!("{}: {e}", collection.file_name()))
        }),
        None => Ok(T::default()),
    }
}

/// Serialize a typed collection into its stored document form.
///
/// # Errors
///
/// Returns `RepositoryError::Storage` if serialization fails.
pub fn to_document<T: Serialize>(value: &T) -> Result<Value, RepositoryError> {
    serde_json::to_value(value).map_err(|e| RepositoryError::Storage(e.to_string()))
}

/// Persist a typed collection as a whole-document replacement.
///
/// # Errors
///
/// Returns `RepositoryError::Storage` on serialization or write failure.
pub fn store<T: Serialize>(
    storage: &dyn Storage,
    collection: Collection,
    value: &T,
) -> Result<(), RepositoryError> {
    storage.write(collection, to_document(value)?)
}

/// File-backed storage: one pretty-printed JSON file per collection.
#[derive(Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Create a file-backed store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| RepositoryError::Storage(format!("creating {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.dir.join(collection.file_name())
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, collection: Collection) -> Result<Option<Value>, RepositoryError> {
        let path = self.path(collection);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(RepositoryError::Storage(format!(
                    "reading {}: {e}",
                    path.display()
                )));
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| RepositoryError::DataCorruption(format!("{}: {e}", path.display())))
    }

    fn write(&self, collection: Collection, document: Value) -> Result<(), RepositoryError> {
        let path = self.path(collection);
        let raw = serde_json::to_string_pretty(&document)
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        std::fs::write(&path, raw)
            .map_err(|e| RepositoryError::Storage(format!("writing {}: {e}", path.display())))
    }
}

/// In-memory storage backend.
///
/// Used by the test suites and useful for ephemeral deployments. `write_all`
/// applies the whole batch under a single lock, so the checkout write of
/// order list plus cart map is observed atomically.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: Mutex<HashMap<Collection, Value>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Collection, Value>>, RepositoryError>
    {
        self.documents
            .lock()
            .map_err(|_| RepositoryError::Storage("storage lock poisoned".to_string()))
    }
}

impl Storage for MemoryStorage {
    fn read(&self, collection: Collection) -> Result<Option<Value>, RepositoryError> {
        Ok(self.lock()?.get(&collection).cloned())
    }

    fn write(&self, collection: Collection, document: Value) -> Result<(), RepositoryError> {
        self.lock()?.insert(collection, document);
        Ok(())
    }

    fn write_all(&self, batch: Vec<(Collection, Value)>) -> Result<(), RepositoryError> {
        let mut documents = self.lock()?;
        for (collection, document) in batch {
            documents.insert(collection, document);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.read(Collection::Users).expect("read").is_none());

        storage
            .write(Collection::Users, json!([{"id": "user001"}]))
            .expect("write");
        let doc = storage
            .read(Collection::Users)
            .expect("read")
            .expect("document");
        assert_eq!(doc, json!([{"id": "user001"}]));
    }

    #[test]
    fn test_memory_storage_write_replaces_whole_document() {
        let storage = MemoryStorage::new();
        storage
            .write(Collection::Orders, json!([{"id": "a"}, {"id": "b"}]))
            .expect("write");
        storage
            .write(Collection::Orders, json!([{"id": "c"}]))
            .expect("write");

        let doc = storage
            .read(Collection::Orders)
            .expect("read")
            .expect("document");
        assert_eq!(doc, json!([{"id": "c"}]));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path()).expect("storage");

        assert!(storage.read(Collection::Products).expect("read").is_none());

        storage
            .write(Collection::Products, json!([{"id": "prod1"}]))
            .expect("write");
        let doc = storage
            .read(Collection::Products)
            .expect("read")
            .expect("document");
        assert_eq!(doc, json!([{"id": "prod1"}]));
    }

    #[test]
    fn test_file_storage_rejects_corrupt_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = JsonFileStorage::new(dir.path()).expect("storage");
        std::fs::write(dir.path().join("brands.json"), "{not json").expect("write file");

        assert!(matches!(
            storage.read(Collection::Brands),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_load_defaults_missing_collection() {
        let storage = MemoryStorage::new();
        let users: Vec<serde_json::Value> = load(&storage, Collection::Users).expect("load");
        assert!(users.is_empty());
    }
}

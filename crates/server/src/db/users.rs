//! User repository over the `users` collection.

use greenbasket_core::UserId;

use super::{Collection, RepositoryError, Storage};
use crate::models::User;

/// Repository for user records.
pub struct UserRepository<'a> {
    storage: &'a dyn Storage,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage) -> Self {
        Self { storage }
    }

    /// Load the whole users collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn all(&self) -> Result<Vec<User>, RepositoryError> {
        super::load(self.storage, Collection::Users)
    }

    /// Look up a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|u| &u.id == id))
    }

    /// Look up a user by email. Exact match on the stored value, the same
    /// comparison registration uses to detect duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` on read or parse failure.
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self.all()?.into_iter().find(|u| u.email.as_str() == email))
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    pub fn insert(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.all()?;
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email {} already registered",
                user.email
            )));
        }
        users.push(user);
        super::store(self.storage, Collection::Users, &users)
    }

    /// Mutate a user in place and persist the collection.
    ///
    /// The mutation closure runs against the stored record; `updated_at` is
    /// stamped afterwards.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the id is unknown.
    pub fn update(
        &self,
        id: &UserId,
        mutate: impl FnOnce(&mut User),
    ) -> Result<User, RepositoryError> {
        let mut users = self.all()?;
        let user = users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or(RepositoryError::NotFound)?;

        mutate(user);
        user.updated_at = chrono::Utc::now();
        let updated = user.clone();

        super::store(self.storage, Collection::Users, &users)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use greenbasket_core::Email;

    fn user(name: &str, email: &str) -> User {
        User::new(
            name.to_string(),
            Email::parse(email).expect("valid email"),
            String::new(),
            "$argon2id$stub".to_string(),
        )
    }

    #[test]
    fn test_insert_and_lookup() {
        let storage = MemoryStorage::new();
        let repo = UserRepository::new(&storage);

        let alice = user("Alice", "alice@example.com");
        let id = alice.id.clone();
        repo.insert(alice).expect("insert");

        assert!(repo.get_by_id(&id).expect("get").is_some());
        assert!(
            repo.get_by_email("alice@example.com")
                .expect("get")
                .is_some()
        );
        assert!(repo.get_by_email("bob@example.com").expect("get").is_none());
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let storage = MemoryStorage::new();
        let repo = UserRepository::new(&storage);

        repo.insert(user("Alice", "alice@example.com")).expect("insert");
        let result = repo.insert(user("Imposter", "alice@example.com"));
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }

    #[test]
    fn test_email_lookup_is_case_sensitive() {
        let storage = MemoryStorage::new();
        let repo = UserRepository::new(&storage);
        repo.insert(user("Alice", "alice@example.com")).expect("insert");

        assert!(
            repo.get_by_email("Alice@example.com")
                .expect("get")
                .is_none()
        );
    }

    #[test]
    fn test_update_stamps_updated_at() {
        let storage = MemoryStorage::new();
        let repo = UserRepository::new(&storage);

        let alice = user("Alice", "alice@example.com");
        let id = alice.id.clone();
        let created_at = alice.created_at;
        repo.insert(alice).expect("insert");

        let updated = repo
            .update(&id, |u| u.phone = "+96500000000".to_string())
            .expect("update");
        assert_eq!(updated.phone, "+96500000000");
        assert!(updated.updated_at >= created_at);

        let missing = repo.update(&UserId::new("nope"), |_| {});
        assert!(matches!(missing, Err(RepositoryError::NotFound)));
    }
}

//! Authentication service: registration, login, and bearer tokens.

mod error;
mod token;

pub use error::AuthError;
pub use token::TokenService;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use greenbasket_core::{Email, UserId};

use crate::db::{RepositoryError, Storage, users::UserRepository};
use crate::models::{PublicUser, User};

/// Minimum password length for new registrations.
const MIN_PASSWORD_LENGTH: usize = 8;

/// The fixed demo password the original data set was written against.
/// Accepted only for legacy seed records that carry no password hash.
const LEGACY_DEMO_PASSWORD: &str = "password123";

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(storage: &'a dyn Storage, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(storage),
            tokens,
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::WeakPassword` on
    /// validation failure, and `AuthError::UserAlreadyExists` when the email
    /// is taken.
    #[instrument(skip(self, password))]
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<(String, PublicUser), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let user = User::new(
            name.to_string(),
            email,
            phone.unwrap_or_default().to_string(),
            password_hash,
        );
        let public = user.public();
        let user_id = user.id.clone();

        self.users.insert(user).map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        let token = self.tokens.issue(&user_id)?;
        tracing::info!(user_id = %user_id, "user registered");
        Ok((token, public))
    }

    /// Authenticate an existing account.
    ///
    /// Records with a stored hash verify against it; legacy seed records
    /// without one accept the fixed demo password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on unknown email or password
    /// mismatch.
    #[instrument(skip(self, password))]
    pub fn login(&self, email: &str, password: &str) -> Result<(String, PublicUser), AuthError> {
        let user = self
            .users
            .get_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = match &user.password_hash {
            Some(hash) => verify_password(password, hash),
            None => password == LEGACY_DEMO_PASSWORD,
        };
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id)?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((token, user.public()))
    }

    /// Resolve the account behind a verified token subject.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the record has been removed.
    pub fn current_user(&self, user_id: &UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)?
            .ok_or(AuthError::UserNotFound)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use secrecy::SecretString;

    fn tokens() -> TokenService {
        TokenService::new(SecretString::from("test-secret-at-least-32-chars-long!"), 24)
    }

    #[test]
    fn test_register_then_login() {
        let storage = MemoryStorage::new();
        let tokens = tokens();
        let auth = AuthService::new(&storage, &tokens);

        let (token, public) = auth
            .register("Alice", "alice@example.com", "correct-horse", None)
            .expect("register");
        assert_eq!(public.name, "Alice");
        assert_eq!(tokens.verify(&token).expect("verify"), public.id);

        let (_, logged_in) = auth
            .login("alice@example.com", "correct-horse")
            .expect("login");
        assert_eq!(logged_in.id, public.id);
    }

    #[test]
    fn test_login_rejects_wrong_password() {
        let storage = MemoryStorage::new();
        let tokens = tokens();
        let auth = AuthService::new(&storage, &tokens);
        auth.register("Alice", "alice@example.com", "correct-horse", None)
            .expect("register");

        assert!(matches!(
            auth.login("alice@example.com", "wrong-password"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "correct-horse"),
            Err(AuthError::InvalidCredentials)
        ));
        // A hashed account must not accept the legacy demo password.
        assert!(matches!(
            auth.login("alice@example.com", LEGACY_DEMO_PASSWORD),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_legacy_record_accepts_demo_password() {
        let storage = MemoryStorage::new();
        let tokens = tokens();

        let mut user = User::new(
            "Seed User".to_string(),
            Email::parse("seed@example.com").expect("valid email"),
            String::new(),
            String::new(),
        );
        user.password_hash = None;
        UserRepository::new(&storage).insert(user).expect("insert");

        let auth = AuthService::new(&storage, &tokens);
        assert!(auth.login("seed@example.com", LEGACY_DEMO_PASSWORD).is_ok());
        assert!(matches!(
            auth.login("seed@example.com", "anything-else"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_duplicate_registration_conflicts() {
        let storage = MemoryStorage::new();
        let tokens = tokens();
        let auth = AuthService::new(&storage, &tokens);
        auth.register("Alice", "alice@example.com", "correct-horse", None)
            .expect("register");

        assert!(matches!(
            auth.register("Imposter", "alice@example.com", "other-password", None),
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[test]
    fn test_registration_validation() {
        let storage = MemoryStorage::new();
        let tokens = tokens();
        let auth = AuthService::new(&storage, &tokens);

        assert!(matches!(
            auth.register("Alice", "not-an-email", "correct-horse", None),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            auth.register("Alice", "alice@example.com", "short", None),
            Err(AuthError::WeakPassword(_))
        ));
    }
}

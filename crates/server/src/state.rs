//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::db::Storage;
use crate::services::{AuthService, CartService, OrderService, TokenService};

/// Shared application state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    storage: Arc<dyn Storage>,
    tokens: TokenService,
}

impl AppState {
    /// Build the application state from config and a storage backend.
    #[must_use]
    pub fn new(config: ServerConfig, storage: Arc<dyn Storage>) -> Self {
        let tokens = TokenService::new(config.token_secret.clone(), config.token_ttl_hours);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storage,
                tokens,
            }),
        }
    }

    /// Server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// The storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.inner.storage.as_ref()
    }

    /// Token issue/verify service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Authentication service bound to this state's storage.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.storage(), self.tokens())
    }

    /// Cart service bound to this state's storage.
    #[must_use]
    pub fn carts(&self) -> CartService<'_> {
        CartService::new(self.storage())
    }

    /// Order service bound to this state's storage.
    #[must_use]
    pub fn orders(&self) -> OrderService<'_> {
        OrderService::new(self.storage())
    }
}

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use crate::models::{user, User};

use super::{jwt::is_token_expired, token_store::TokenStore};

/// Who is logged in, passed explicitly to everything that needs it.
///
/// Created once at startup with [`AuthSession::load`] and torn down with
/// [`AuthSession::clear`] on logout or when the backend rejects the token.
/// Cloning shares the same underlying state.
#[derive(Clone)]
pub struct AuthSession {
    store: Arc<TokenStore>,
}

impl AuthSession {
    pub fn load(store: TokenStore) -> Self {
        let session = Self {
            store: Arc::new(store),
        };
        if session.token().is_some() && session.is_token_expired() {
            log::info!("Stored token has expired; starting signed out");
            session.clear();
        }
        session
    }

    pub fn anonymous() -> Self {
        Self {
            store: Arc::new(TokenStore::in_memory()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.token()
    }

    pub fn user(&self) -> Option<User> {
        self.store.user()
    }

    /// True when no usable token is held.
    pub fn is_token_expired(&self) -> bool {
        match self.store.token() {
            Some(token) => is_token_expired(&token, Utc::now()),
            None => true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && !self.is_token_expired()
    }

    pub fn is_admin(&self) -> bool {
        self.user().as_ref().is_some_and(user::is_admin)
    }

    pub fn establish(&self, token: String, user: User) -> Result<()> {
        self.store.set_credentials(token, user)
    }

    pub fn remember_user(&self, user: User) -> Result<()> {
        self.store.set_user(user)
    }

    /// Drop all credentials. Failures to remove the file are logged, not
    /// returned: the in-memory state is cleared regardless.
    pub fn clear(&self) {
        if let Err(err) = self.store.clear() {
            log::error!("Failed to clear auth state: {err:#}");
        }
    }
}

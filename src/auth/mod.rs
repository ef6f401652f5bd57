//! Wallet-session authentication state.
//!
//! A user is authenticated exactly when a wallet account is connected; the
//! session token is kept in the persisted local store.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::chain::client::ChainClient;
use crate::storage::{LocalStore, AUTH_TOKEN_KEY};

/// The connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub address: Address,
    pub is_connected: bool,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
}

impl AuthState {
    /// Derive the auth state from the client's current connection.
    pub fn from_client<C: ChainClient>(client: &C) -> Self {
        match client.current_address() {
            Some(address) => Self {
                is_authenticated: true,
                user: Some(User {
                    address,
                    is_connected: true,
                    chain_id: Some(client.current_chain_id()).filter(|id| *id != 0),
                }),
            },
            None => Self::default(),
        }
    }
}

pub fn is_authenticated(user: Option<&User>) -> bool {
    user.is_some_and(|u| u.is_connected)
}

pub fn is_on_correct_chain(user: Option<&User>, required_chain_id: u64) -> bool {
    user.is_some_and(|u| u.chain_id == Some(required_chain_id))
}

/// Session token persistence.
#[derive(Clone)]
pub struct AuthTokens {
    store: Arc<dyn LocalStore>,
}

impl AuthTokens {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: &str) {
        self.store.set(AUTH_TOKEN_KEY, token);
    }

    pub fn clear(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
    }
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token itself.
        f.debug_struct("AuthTokens")
            .field("present", &self.token().is_some())
            .finish()
    }
}

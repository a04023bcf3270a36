//! Credential table authentication.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::traits::Authenticator;

/// Lowercase hex SHA-256 of a password, as stored in the credential table.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Username to password hash.
#[derive(Debug, Clone, Default)]
pub struct CredentialTable {
    users: HashMap<String, String>,
}

impl CredentialTable {
    pub fn new(users: HashMap<String, String>) -> Self {
        let users = users
            .into_iter()
            .map(|(user, hash)| (user, hash.trim().to_ascii_lowercase()))
            .collect();
        Self { users }
    }

    pub fn with_user(mut self, username: impl Into<String>, password: &str) -> Self {
        self.users.insert(username.into(), hash_password(password));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Authenticator for CredentialTable {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(expected) => *expected == hash_password(password),
            None => {
                warn!("Login attempt for unknown user '{}'", username);
                false
            }
        }
    }
}

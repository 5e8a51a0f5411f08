use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::AuthError;

/// In-process CredentialStore keyed by email.
///
/// Enforces the same email uniqueness contract as the PostgreSQL store.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    identities: RwLock<HashMap<EmailAddress, Identity>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an identity, as an out-of-band deletion would.
    pub fn remove(&self, email: &EmailAddress) -> Option<Identity> {
        self.identities
            .write()
            .ok()
            .and_then(|mut identities| identities.remove(email))
    }

    /// Apply an out-of-band change to a stored identity.
    pub fn modify<F>(&self, email: &EmailAddress, change: F) -> bool
    where
        F: FnOnce(&mut Identity),
    {
        match self.identities.write() {
            Ok(mut identities) => identities.get_mut(email).map(change).is_some(),
            Err(_) => false,
        }
    }
}

fn poisoned<T>(_: T) -> AuthError {
    AuthError::Store("credential store lock poisoned".to_string())
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let identities = self.identities.read().map_err(poisoned)?;
        Ok(identities.get(email).cloned())
    }

    async fn create(&self, identity: Identity) -> Result<Identity, AuthError> {
        let mut identities = self.identities.write().map_err(poisoned)?;

        if identities.contains_key(&identity.email) {
            return Err(AuthError::UserExists(identity.email.to_string()));
        }

        identities.insert(identity.email.clone(), identity.clone());
        Ok(identity)
    }

    async fn update_last_login(
        &self,
        id: &IdentityId,
        at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let mut identities = self.identities.write().map_err(poisoned)?;

        let identity = identities
            .values_mut()
            .find(|identity| identity.id == *id)
            .ok_or_else(|| AuthError::Store(format!("Identity {} not found", id)))?;

        identity.last_login = Some(at);
        identity.updated_at = at;
        Ok(())
    }
}

use crate::db::{Account, AccountStoreHandle};
use crate::error::VaultError;
use crate::service::password::{PasswordGenerator, RandomPassword};
use std::sync::Arc;
use tracing::debug;

/// Service layer composing password generation with the account store.
#[derive(Clone)]
pub struct AccountService {
    store: AccountStoreHandle,
    generator: Arc<dyn PasswordGenerator>,
}

impl AccountService {
    pub fn new(store: AccountStoreHandle) -> Self {
        Self::with_generator(store, RandomPassword)
    }

    pub fn with_generator(
        store: AccountStoreHandle,
        generator: impl PasswordGenerator + 'static,
    ) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
        }
    }

    pub fn store(&self) -> &AccountStoreHandle {
        &self.store
    }

    /// Generate a password and store it for `(service, username)`.
    ///
    /// `Ok(false)` when the pair already exists; the freshly generated password
    /// is dropped and the stored one is left untouched.
    pub async fn add_account(
        &self,
        service: impl AsRef<str>,
        username: impl AsRef<str>,
    ) -> Result<bool, VaultError> {
        let (service, username) = (service.as_ref(), username.as_ref());
        debug!(service, username, "add_account");
        let password = self.generator.generate();
        self.store.add(service, username, password).await
    }

    pub async fn get_account(
        &self,
        service: impl AsRef<str>,
        username: impl AsRef<str>,
    ) -> Result<Option<Account>, VaultError> {
        let (service, username) = (service.as_ref(), username.as_ref());
        debug!(service, username, "get_account");
        self.store.get(service, username).await
    }

    pub async fn close(&self) {
        self.store.close().await
    }
}

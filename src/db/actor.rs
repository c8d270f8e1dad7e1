use crate::db::models::Account;
use crate::db::sqlite::AccountsStorage;
use crate::error::VaultError;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Messages handled by the account store actor. Each one is a single store
/// operation; the actor processes them strictly one after another.
#[derive(Debug)]
pub enum AccountStoreMessage {
    Exists(String, String, RpcReplyPort<Result<bool, VaultError>>),
    Add(
        String,
        String,
        String,
        RpcReplyPort<Result<bool, VaultError>>,
    ),
    Get(
        String,
        String,
        RpcReplyPort<Result<Option<Account>, VaultError>>,
    ),
    Remove(String, String, RpcReplyPort<Result<(), VaultError>>),
    /// Close the connection, reply, then stop the actor.
    Close(RpcReplyPort<()>),
}

/// Handle for interacting with the account store actor.
#[derive(Clone)]
pub struct AccountStoreHandle {
    actor: ActorRef<AccountStoreMessage>,
    path: PathBuf,
}

impl AccountStoreHandle {
    /// Path of the database file behind this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(
        &self,
        service: impl AsRef<str>,
        username: impl AsRef<str>,
    ) -> Result<bool, VaultError> {
        ractor::call!(
            self.actor,
            AccountStoreMessage::Exists,
            service.as_ref().to_string(),
            username.as_ref().to_string()
        )
        .map_err(|_| VaultError::StoreClosed)?
    }

    /// Insert unless the key exists. `Ok(false)` means "already there".
    pub async fn add(
        &self,
        service: impl AsRef<str>,
        username: impl AsRef<str>,
        password: impl AsRef<str>,
    ) -> Result<bool, VaultError> {
        ractor::call!(
            self.actor,
            AccountStoreMessage::Add,
            service.as_ref().to_string(),
            username.as_ref().to_string(),
            password.as_ref().to_string()
        )
        .map_err(|_| VaultError::StoreClosed)?
    }

    pub async fn get(
        &self,
        service: impl AsRef<str>,
        username: impl AsRef<str>,
    ) -> Result<Option<Account>, VaultError> {
        ractor::call!(
            self.actor,
            AccountStoreMessage::Get,
            service.as_ref().to_string(),
            username.as_ref().to_string()
        )
        .map_err(|_| VaultError::StoreClosed)?
    }

    pub async fn remove(
        &self,
        service: impl AsRef<str>,
        username: impl AsRef<str>,
    ) -> Result<(), VaultError> {
        ractor::call!(
            self.actor,
            AccountStoreMessage::Remove,
            service.as_ref().to_string(),
            username.as_ref().to_string()
        )
        .map_err(|_| VaultError::StoreClosed)?
    }

    /// Close the underlying connection and resolve once it is closed.
    ///
    /// Idempotent: closing an already closed store is a no-op, whether or not
    /// the actor has finished stopping. Every other call on this handle (or
    /// its clones) afterwards fails with [`VaultError::StoreClosed`].
    pub async fn close(&self) {
        if ractor::call!(self.actor, AccountStoreMessage::Close).is_err() {
            debug!(path = %self.path.display(), "close on a stopped store");
        }
    }
}

/// Internal state held by the account store actor
struct AccountStoreState {
    storage: AccountsStorage,
    closed: bool,
}

/// ractor-based account store actor
struct AccountStoreActor;

#[ractor::async_trait]
impl Actor for AccountStoreActor {
    type Msg = AccountStoreMessage;
    type State = AccountStoreState;
    type Arguments = AccountsStorage;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        storage: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        debug!(path = %storage.path().display(), "AccountStoreActor started");
        Ok(AccountStoreState {
            storage,
            closed: false,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if state.closed {
            // Messages that raced the stop signal.
            Self::reject(message);
            return Ok(());
        }

        match message {
            AccountStoreMessage::Exists(service, username, rp) => {
                let res = state.storage.exists(&service, &username).await;
                Self::reply(rp, res, "exists");
            }
            AccountStoreMessage::Add(service, username, password, rp) => {
                let res = state.storage.add(&service, &username, &password).await;
                Self::reply(rp, res, "add");
            }
            AccountStoreMessage::Get(service, username, rp) => {
                let res = state.storage.get(&service, &username).await;
                Self::reply(rp, res, "get");
            }
            AccountStoreMessage::Remove(service, username, rp) => {
                let res = state.storage.remove(&service, &username).await;
                Self::reply(rp, res, "remove");
            }
            AccountStoreMessage::Close(rp) => {
                state.storage.close().await;
                state.closed = true;
                let _ = rp.send(());
                myself.stop(Some("closed".to_string()));
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        if !state.closed {
            state.storage.close().await;
        }
        Ok(())
    }
}

impl AccountStoreActor {
    fn reply<T: Send + 'static>(
        rp: RpcReplyPort<Result<T, VaultError>>,
        res: Result<T, VaultError>,
        op: &str,
    ) {
        if let Err(e) = &res {
            warn!(op, error = %e, "store operation failed");
        }
        if rp.send(res).is_err() {
            debug!(op, "caller dropped before reply");
        }
    }

    fn reject(message: AccountStoreMessage) {
        match message {
            AccountStoreMessage::Exists(_, _, rp) | AccountStoreMessage::Add(_, _, _, rp) => {
                let _ = rp.send(Err(VaultError::StoreClosed));
            }
            AccountStoreMessage::Get(_, _, rp) => {
                let _ = rp.send(Err(VaultError::StoreClosed));
            }
            AccountStoreMessage::Remove(_, _, rp) => {
                let _ = rp.send(Err(VaultError::StoreClosed));
            }
            AccountStoreMessage::Close(rp) => {
                let _ = rp.send(());
            }
        }
    }
}

/// Open (or create) the database at `path` and spawn the actor that owns it.
///
/// Fails fast if the schema cannot be applied to a new file.
pub async fn spawn(path: impl AsRef<Path>) -> Result<AccountStoreHandle, VaultError> {
    let path = path.as_ref();
    let storage = AccountsStorage::initialize(path).await?;
    let (actor, _jh) = Actor::spawn(None, AccountStoreActor, storage)
        .await
        .map_err(|e| VaultError::RactorError(format!("spawn AccountStoreActor failed: {e}")))?;
    Ok(AccountStoreHandle {
        actor,
        path: path.to_path_buf(),
    })
}

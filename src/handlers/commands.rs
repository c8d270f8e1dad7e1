use crate::cli::Command;
use crate::db::Account;
use crate::error::VaultError;
use crate::service::AccountService;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Result of one command, rendered to stdout by `main`.
#[derive(Debug)]
pub enum Outcome {
    Ready(PathBuf),
    Destroyed,
    DestroyFailed(VaultError),
    Created { service: String, username: String },
    AlreadyExists { service: String, username: String },
    Found(Account),
    NotFound,
    Failed(VaultError),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ready(path) => write!(f, "Database ready at {}.", path.display()),
            Outcome::Destroyed => write!(f, "Database destroyed."),
            Outcome::DestroyFailed(e) => write!(f, "Failed to destroy the database: {e}"),
            Outcome::Created { service, username } => {
                write!(f, "Success! Now try `get {service} {username}`.")
            }
            Outcome::AlreadyExists { service, username } => write!(
                f,
                "{service}+{username} already exists; try `get {service} {username}` instead."
            ),
            Outcome::Found(account) => write!(f, "{account}"),
            Outcome::NotFound => write!(
                f,
                "No such account: either the service has no such user, or the user has no such service."
            ),
            Outcome::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// Run one command against an already opened store.
///
/// Store errors become [`Outcome::Failed`]; only the caller decides whether to
/// exit. `destroy` closes the store, so the service must not be used afterwards.
pub async fn execute(command: Command, service: &AccountService) -> Outcome {
    match command {
        Command::Init => Outcome::Ready(service.store().path().to_path_buf()),
        Command::Destroy => destroy(service).await,
        Command::New { service: svc, username } => {
            match service.add_account(&svc, &username).await {
                Ok(true) => {
                    debug!(service = %svc, username = %username, "account created");
                    Outcome::Created {
                        service: svc,
                        username,
                    }
                }
                Ok(false) => {
                    debug!(service = %svc, username = %username, "account already exists");
                    Outcome::AlreadyExists {
                        service: svc,
                        username,
                    }
                }
                Err(e) => {
                    error!(error = %e, "new failed");
                    Outcome::Failed(e)
                }
            }
        }
        Command::Get { service: svc, username } => {
            match service.get_account(&svc, &username).await {
                Ok(Some(account)) => Outcome::Found(account),
                Ok(None) => {
                    debug!(service = %svc, username = %username, "account not found");
                    Outcome::NotFound
                }
                Err(e) => {
                    error!(error = %e, "get failed");
                    Outcome::Failed(e)
                }
            }
        }
    }
}

/// Run one command and close the store afterwards. `destroy` closes it itself.
pub async fn run(command: Command, service: &AccountService) -> Outcome {
    let closes_store = matches!(command, Command::Destroy);
    let outcome = execute(command, service).await;
    if !closes_store {
        service.close().await;
    }
    outcome
}

async fn destroy(service: &AccountService) -> Outcome {
    let path = service.store().path().to_path_buf();
    service.close().await;
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {
            info!(path = %path.display(), "database destroyed");
            Outcome::Destroyed
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to delete database file");
            Outcome::DestroyFailed(e.into())
        }
    }
}

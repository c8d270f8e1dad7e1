pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod service;

pub use config::Config;
pub use db::{Account, AccountStoreHandle};
pub use error::VaultError;
pub use service::AccountService;

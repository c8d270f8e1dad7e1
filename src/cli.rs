use clap::{Parser, Subcommand};

/// Generate and keep random passwords per service and username.
#[derive(Debug, Parser)]
#[command(name = "passbook", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Prepare the database (it is created on first use anyway)
    Init,
    /// Close and delete the database. Irreversible!
    Destroy,
    /// Create a new password for service+username
    New { service: String, username: String },
    /// Print the password stored for service+username
    Get { service: String, username: String },
}

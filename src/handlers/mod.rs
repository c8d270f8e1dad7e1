pub mod commands;

pub use commands::{Outcome, execute, run};

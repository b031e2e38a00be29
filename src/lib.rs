pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod reconcile;
pub mod resolve;
pub mod schema;
pub mod source;
pub mod store;

pub use cli::{Cli, Commands};
pub use error::{Error, Result};
pub use reconcile::{Reconciler, RunOptions};
pub use store::SqliteStore;

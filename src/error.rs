//! Error type for usage imports.
//!
//! Only faults that abort a batch live here. A missing source document, an
//! unresolved name and the usage cutoff are ordinary outcomes and are
//! reported through return values instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::source::Provider;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("malformed {provider} document for {tier}: {source}")]
    Parse {
        tier: String,
        provider: Provider,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown provider: {0:?}")]
    UnknownProvider(String),

    #[error("schema error: {0}")]
    Schema(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Usage source documents: reading them and normalizing both document
//! shapes into [`UsageEntry`] lists.

pub mod entry;
pub mod format;
pub mod ladder;
pub mod reader;
pub mod standings;

pub use entry::{Provider, SubFact, UsageEntry};
pub use format::{PercentPolicy, SourceFormat};
pub use reader::{FsSourceReader, MemorySourceReader, SourceReader, DEFAULT_LADDER_REF};

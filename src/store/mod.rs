pub mod catalog;
pub mod gateway;
pub mod schema_gen;
pub mod sqlite;
pub mod value;

pub use catalog::*;
pub use gateway::*;
pub use sqlite::SqliteStore;
pub use value::SqlValue;

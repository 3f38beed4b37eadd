pub mod http;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use http::HttpArticleStore;
pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteStorage;

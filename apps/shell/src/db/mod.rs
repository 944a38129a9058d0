//! Local SQLite persistence.

pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{BlobStore, DeckRepository, SqliteStore};

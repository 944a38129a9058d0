//! Repository pattern for database access.

use crate::db::error::DbError;
use crate::db::schema::{DECK_KEY, SCHEMA};
use chrono::Utc;
use qa_core::{Card, DeckStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Keyed blob storage.
pub trait BlobStore {
    fn save(&self, key: &str, blob: &[u8]) -> Result<()>;
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

/// The deck, stored as one JSON blob under a fixed key.
pub trait DeckRepository {
    fn save_deck(&self, deck: &DeckStore) -> Result<()>;
    /// `Ok(None)` when nothing has been saved yet.
    fn load_deck(&self) -> Result<Option<DeckStore>>;
}

impl<T: BlobStore + ?Sized> DeckRepository for T {
    fn save_deck(&self, deck: &DeckStore) -> Result<()> {
        let blob = serde_json::to_vec(deck.cards())?;
        self.save(DECK_KEY, &blob)
    }

    fn load_deck(&self) -> Result<Option<DeckStore>> {
        let Some(blob) = self.load(DECK_KEY)? else {
            return Ok(None);
        };
        let cards: Vec<Card> = serde_json::from_slice(&blob)?;
        Ok(Some(DeckStore::from_cards(cards)))
    }
}

/// SQLite-backed store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating it and its directory if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl BlobStore for SqliteStore {
    fn save(&self, key: &str, blob: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO qa_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, blob, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.conn
            .query_row("SELECT value FROM qa_store WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }
}
